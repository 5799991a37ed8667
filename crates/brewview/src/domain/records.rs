//! Recipe-level records: recipes, styles, brew notes, equipment, mashes and folders.

use std::sync::Arc;

use brewview_core::Property;
use chrono::{NaiveDate, NaiveDateTime};

use super::{Element, ElementBase};
use crate::model::ItemData;

/// A style guideline entry.
#[derive(Debug)]
pub struct Style {
    base: ElementBase,
    name: Property<String>,
    category: Property<String>,
    category_number: Property<String>,
    style_letter: Property<String>,
    style_guide: Property<String>,
}

impl Style {
    /// Creates a style with empty guideline fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: ElementBase::new(),
            name: Property::new(name.into()),
            category: Property::new(String::new()),
            category_number: Property::new(String::new()),
            style_letter: Property::new(String::new()),
            style_guide: Property::new(String::new()),
        }
    }

    element_fields! {
        /// Display name.
        name, set_name, with_name: String => "name";
        /// Guideline category, e.g. "Pale Ale".
        category, set_category, with_category: String => "category";
        /// Guideline category number, e.g. "10".
        category_number, set_category_number, with_category_number: String => "category_number";
        /// Sub-category letter, e.g. "A".
        style_letter, set_style_letter, with_style_letter: String => "style_letter";
        /// Guideline name, e.g. "BJCP".
        style_guide, set_style_guide, with_style_guide: String => "style_guide";
    }
}

impl Element for Style {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn name(&self) -> String {
        self.name.get()
    }
}

/// Notes taken on one brew day.
#[derive(Debug)]
pub struct BrewNote {
    base: ElementBase,
    brew_date: Property<NaiveDateTime>,
}

impl BrewNote {
    /// Creates a note for the given brew date.
    pub fn new(brew_date: NaiveDateTime) -> Self {
        Self {
            base: ElementBase::new(),
            brew_date: Property::new(brew_date),
        }
    }

    element_fields! {
        /// When the brew took place.
        brew_date, set_brew_date, with_brew_date: NaiveDateTime => "brew_date";
    }

    /// The brew date without time of day, as `YYYY-MM-DD`.
    pub fn brew_date_short(&self) -> String {
        self.brew_date.with(|d| d.format("%Y-%m-%d").to_string())
    }
}

impl Element for BrewNote {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn name(&self) -> String {
        self.brew_date_short()
    }
}

/// A recipe.
///
/// The style is held by reference; replacing it notifies with the new style's name.
#[derive(Debug)]
pub struct Recipe {
    base: ElementBase,
    name: Property<String>,
    date: Property<NaiveDate>,
    style: Property<Option<Arc<Style>>>,
    brew_notes: Property<Vec<Arc<BrewNote>>>,
}

impl Recipe {
    /// Creates a recipe dated `date` with no style.
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            base: ElementBase::new(),
            name: Property::new(name.into()),
            date: Property::new(date),
            style: Property::new(None),
            brew_notes: Property::new(Vec::new()),
        }
    }

    element_fields! {
        /// Display name.
        name, set_name, with_name: String => "name";
        /// Date the recipe was created or last brewed.
        date, set_date, with_date: NaiveDate => "date";
    }

    /// The recipe's style, if one is assigned.
    pub fn style(&self) -> Option<Arc<Style>> {
        self.style.get()
    }

    /// Assigns or clears the style.
    pub fn set_style(&self, style: Option<Arc<Style>>) {
        let changed = self.style.update(|current| {
            let unchanged = match (current.as_ref(), style.as_ref()) {
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            };
            if unchanged {
                return None;
            }
            let value = ItemData::from(style.as_ref().map(|s| s.name()));
            *current = style;
            Some(value)
        });
        if let Some(value) = changed {
            self.base.notify("style", value);
        }
    }

    /// Builder form of [`set_style`](Self::set_style); does not notify.
    pub fn with_style(self, style: Arc<Style>) -> Self {
        self.style.set_silent(Some(style));
        self
    }

    /// Brew notes recorded against this recipe, oldest first.
    pub fn brew_notes(&self) -> Vec<Arc<BrewNote>> {
        self.brew_notes.get()
    }

    /// Records a brew note.
    pub fn add_brew_note(&self, note: Arc<BrewNote>) {
        let count = self.brew_notes.update(|notes| {
            notes.push(note);
            notes.len()
        });
        self.base.notify("brew_notes", ItemData::Int(count as i64));
    }
}

impl Element for Recipe {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn name(&self) -> String {
        self.name.get()
    }
}

/// A brewing system: kettle, mash tun and their losses.
#[derive(Debug)]
pub struct Equipment {
    base: ElementBase,
    name: Property<String>,
    boil_time_min: Property<f64>,
    tun_weight_kg: Property<f64>,
    tun_specific_heat_cal_gc: Property<f64>,
}

impl Equipment {
    /// Creates equipment with a 60 minute boil.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: ElementBase::new(),
            name: Property::new(name.into()),
            boil_time_min: Property::new(60.0),
            tun_weight_kg: Property::new(0.0),
            tun_specific_heat_cal_gc: Property::new(0.0),
        }
    }

    element_fields! {
        /// Display name.
        name, set_name, with_name: String => "name";
        /// Default boil time in minutes.
        boil_time_min, set_boil_time_min, with_boil_time_min: f64 => "boil_time_min";
        /// Mash tun mass in kilograms.
        tun_weight_kg, set_tun_weight_kg, with_tun_weight_kg: f64 => "tun_weight_kg";
        /// Mash tun specific heat in cal/(g·°C).
        tun_specific_heat_cal_gc, set_tun_specific_heat_cal_gc, with_tun_specific_heat_cal_gc: f64
            => "tun_specific_heat_cal_gc";
    }
}

impl Element for Equipment {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn name(&self) -> String {
        self.name.get()
    }
}

/// A mash profile.
#[derive(Debug)]
pub struct Mash {
    base: ElementBase,
    name: Property<String>,
    grain_temp_c: Property<f64>,
    sparge_temp_c: Property<f64>,
    ph: Property<f64>,
    tun_temp_c: Property<f64>,
    tun_weight_kg: Property<f64>,
    tun_specific_heat_cal_gc: Property<f64>,
    equip_adjust: Property<bool>,
    notes: Property<String>,
}

impl Mash {
    /// Creates a mash with room-temperature grain and tun.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: ElementBase::new(),
            name: Property::new(name.into()),
            grain_temp_c: Property::new(20.0),
            sparge_temp_c: Property::new(74.0),
            ph: Property::new(7.0),
            tun_temp_c: Property::new(20.0),
            tun_weight_kg: Property::new(0.0),
            tun_specific_heat_cal_gc: Property::new(0.0),
            equip_adjust: Property::new(false),
            notes: Property::new(String::new()),
        }
    }

    element_fields! {
        /// Display name.
        name, set_name, with_name: String => "name";
        /// Grain temperature in °C.
        grain_temp_c, set_grain_temp_c, with_grain_temp_c: f64 => "grain_temp_c";
        /// Sparge water temperature in °C.
        sparge_temp_c, set_sparge_temp_c, with_sparge_temp_c: f64 => "sparge_temp_c";
        /// Sparge water pH.
        ph, set_ph, with_ph: f64 => "ph";
        /// Mash tun temperature in °C.
        tun_temp_c, set_tun_temp_c, with_tun_temp_c: f64 => "tun_temp_c";
        /// Mash tun mass in kilograms.
        tun_weight_kg, set_tun_weight_kg, with_tun_weight_kg: f64 => "tun_weight_kg";
        /// Mash tun specific heat in cal/(g·°C).
        tun_specific_heat_cal_gc, set_tun_specific_heat_cal_gc, with_tun_specific_heat_cal_gc: f64
            => "tun_specific_heat_cal_gc";
        /// Whether calculations account for the equipment's tun.
        equip_adjust, set_equip_adjust, with_equip_adjust: bool => "equip_adjust";
        /// Free-form notes.
        notes, set_notes, with_notes: String => "notes";
    }
}

impl Element for Mash {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn name(&self) -> String {
        self.name.get()
    }
}

/// A named folder in the browser hierarchy.
#[derive(Debug)]
pub struct Folder {
    base: ElementBase,
    name: Property<String>,
    path: Property<String>,
}

impl Folder {
    /// Creates a folder `name` under the `/`-separated `path`.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            base: ElementBase::new(),
            name: Property::new(name.into()),
            path: Property::new(path.into()),
        }
    }

    element_fields! {
        /// Folder name.
        name, set_name, with_name: String => "name";
        /// Path of the containing folder.
        path, set_path, with_path: String => "path";
    }

    /// Path including the folder's own name.
    pub fn full_path(&self) -> String {
        let path = self.path.get();
        let name = self.name.get();
        let parent = path.trim_end_matches('/');
        if parent.is_empty() {
            format!("/{name}")
        } else {
            format!("{parent}/{name}")
        }
    }
}

impl Element for Folder {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn name(&self) -> String {
        self.name.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_recipe_style_notifies_by_identity() {
        let ipa = Arc::new(Style::new("American IPA"));
        let recipe = Recipe::new("Hop Bomb", date(2024, 5, 1));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = seen.clone();
        recipe.changed().connect(move |change| {
            seen_clone.lock().push(change.value.clone());
        });

        recipe.set_style(Some(ipa.clone()));
        recipe.set_style(Some(ipa.clone()));
        recipe.set_style(None);

        assert_eq!(
            *seen.lock(),
            vec![ItemData::from("American IPA"), ItemData::None]
        );
    }

    #[test]
    fn test_brew_notes_accumulate() {
        let recipe = Recipe::new("Saison", date(2024, 6, 2));
        let when = date(2024, 6, 9).and_hms_opt(8, 30, 0).unwrap();
        recipe.add_brew_note(Arc::new(BrewNote::new(when)));

        let notes = recipe.brew_notes();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].brew_date_short(), "2024-06-09");
    }

    #[test]
    fn test_brew_notes_from_many_threads() {
        let recipe = Arc::new(Recipe::new("Dubbel", date(2024, 2, 3)));
        let when = date(2024, 2, 10).and_hms_opt(9, 0, 0).unwrap();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let recipe = recipe.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        recipe.add_brew_note(Arc::new(BrewNote::new(when)));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(recipe.brew_notes().len(), 100);
    }

    #[test]
    fn test_folder_full_path() {
        assert_eq!(Folder::new("Lagers", "/").full_path(), "/Lagers");
        assert_eq!(Folder::new("Dark", "/Lagers/").full_path(), "/Lagers/Dark");
        assert_eq!(Folder::new("Top", "").full_path(), "/Top");
    }
}
