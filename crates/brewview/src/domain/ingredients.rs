//! Ingredient records: fermentables, hops, miscellaneous additions and yeasts.

use brewview_core::Property;

use super::{Element, ElementBase};

display_enum! {
    /// Kind of fermentable.
    FermentableType {
        /// Malted grain.
        Grain => "Grain",
        /// Sugar.
        Sugar => "Sugar",
        /// Liquid malt extract.
        Extract => "Extract",
        /// Dry malt extract.
        DryExtract => "Dry Extract",
        /// Unmalted adjunct.
        Adjunct => "Adjunct",
    }
}

display_enum! {
    /// Physical form of a hop.
    HopForm {
        /// Whole cones.
        Leaf => "Leaf",
        /// Pellets.
        Pellet => "Pellet",
        /// Pressed plugs.
        Plug => "Plug",
    }
}

display_enum! {
    /// When a hop is added.
    HopUse {
        /// In the mash.
        Mash => "Mash",
        /// First wort.
        FirstWort => "First Wort",
        /// During the boil.
        Boil => "Boil",
        /// At flameout.
        Aroma => "Aroma",
        /// In the fermenter.
        DryHop => "Dry Hop",
    }
}

display_enum! {
    /// Kind of miscellaneous addition.
    MiscType {
        /// Spice.
        Spice => "Spice",
        /// Fining agent.
        Fining => "Fining",
        /// Water treatment.
        WaterAgent => "Water Agent",
        /// Herb.
        Herb => "Herb",
        /// Flavoring.
        Flavor => "Flavor",
        /// Anything else.
        Other => "Other",
    }
}

display_enum! {
    /// When a miscellaneous addition is used.
    MiscUse {
        /// During the boil.
        Boil => "Boil",
        /// In the mash.
        Mash => "Mash",
        /// In primary fermentation.
        Primary => "Primary",
        /// In secondary fermentation.
        Secondary => "Secondary",
        /// At bottling.
        Bottling => "Bottling",
    }
}

display_enum! {
    /// Yeast family.
    YeastType {
        /// Ale yeast.
        Ale => "Ale",
        /// Lager yeast.
        Lager => "Lager",
        /// Wheat beer yeast.
        Wheat => "Wheat",
        /// Wine yeast.
        Wine => "Wine",
        /// Champagne yeast.
        Champagne => "Champagne",
    }
}

display_enum! {
    /// How a yeast is packaged.
    YeastForm {
        /// Liquid culture.
        Liquid => "Liquid",
        /// Dried.
        Dry => "Dry",
        /// Agar slant.
        Slant => "Slant",
        /// Starter culture.
        Culture => "Culture",
    }
}

/// A malt, sugar or extract.
#[derive(Debug)]
pub struct Fermentable {
    base: ElementBase,
    name: Property<String>,
    fermentable_type: Property<FermentableType>,
    amount_kg: Property<f64>,
    is_mashed: Property<bool>,
    yield_pct: Property<f64>,
    color_srm: Property<f64>,
}

impl Fermentable {
    /// Creates a grain with zero amount.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: ElementBase::new(),
            name: Property::new(name.into()),
            fermentable_type: Property::new(FermentableType::Grain),
            amount_kg: Property::new(0.0),
            is_mashed: Property::new(false),
            yield_pct: Property::new(0.0),
            color_srm: Property::new(0.0),
        }
    }

    element_fields! {
        /// Display name.
        name, set_name, with_name: String => "name";
        /// Kind of fermentable.
        fermentable_type, set_fermentable_type, with_fermentable_type: FermentableType => "type";
        /// Amount in kilograms.
        amount_kg, set_amount_kg, with_amount_kg: f64 => "amount_kg";
        /// Whether it is mashed rather than steeped or added to the boil.
        is_mashed, set_is_mashed, with_is_mashed: bool => "is_mashed";
        /// Extract yield in percent.
        yield_pct, set_yield_pct, with_yield_pct: f64 => "yield_pct";
        /// Color in SRM.
        color_srm, set_color_srm, with_color_srm: f64 => "color_srm";
    }
}

impl Element for Fermentable {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn name(&self) -> String {
        self.name.get()
    }
}

/// A hop addition.
#[derive(Debug)]
pub struct Hop {
    base: ElementBase,
    name: Property<String>,
    alpha_pct: Property<f64>,
    amount_kg: Property<f64>,
    hop_use: Property<HopUse>,
    time_min: Property<f64>,
    form: Property<HopForm>,
}

impl Hop {
    /// Creates a boil-addition pellet hop with zero amount.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: ElementBase::new(),
            name: Property::new(name.into()),
            alpha_pct: Property::new(0.0),
            amount_kg: Property::new(0.0),
            hop_use: Property::new(HopUse::Boil),
            time_min: Property::new(0.0),
            form: Property::new(HopForm::Pellet),
        }
    }

    element_fields! {
        /// Display name.
        name, set_name, with_name: String => "name";
        /// Alpha acid content in percent.
        alpha_pct, set_alpha_pct, with_alpha_pct: f64 => "alpha_pct";
        /// Amount in kilograms.
        amount_kg, set_amount_kg, with_amount_kg: f64 => "amount_kg";
        /// When the hop is added.
        hop_use, set_hop_use, with_hop_use: HopUse => "use";
        /// Contact time in minutes.
        time_min, set_time_min, with_time_min: f64 => "time_min";
        /// Physical form.
        form, set_form, with_form: HopForm => "form";
    }
}

impl Element for Hop {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn name(&self) -> String {
        self.name.get()
    }
}

/// A miscellaneous addition such as a spice or fining.
#[derive(Debug)]
pub struct Misc {
    base: ElementBase,
    name: Property<String>,
    misc_type: Property<MiscType>,
    misc_use: Property<MiscUse>,
    amount: Property<f64>,
}

impl Misc {
    /// Creates an "Other" boil addition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: ElementBase::new(),
            name: Property::new(name.into()),
            misc_type: Property::new(MiscType::Other),
            misc_use: Property::new(MiscUse::Boil),
            amount: Property::new(0.0),
        }
    }

    element_fields! {
        /// Display name.
        name, set_name, with_name: String => "name";
        /// Kind of addition.
        misc_type, set_misc_type, with_misc_type: MiscType => "type";
        /// When it is used.
        misc_use, set_misc_use, with_misc_use: MiscUse => "use";
        /// Amount, in kilograms or liters.
        amount, set_amount, with_amount: f64 => "amount";
    }
}

impl Element for Misc {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn name(&self) -> String {
        self.name.get()
    }
}

/// A yeast strain.
#[derive(Debug)]
pub struct Yeast {
    base: ElementBase,
    name: Property<String>,
    yeast_type: Property<YeastType>,
    form: Property<YeastForm>,
}

impl Yeast {
    /// Creates a liquid ale yeast.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: ElementBase::new(),
            name: Property::new(name.into()),
            yeast_type: Property::new(YeastType::Ale),
            form: Property::new(YeastForm::Liquid),
        }
    }

    element_fields! {
        /// Display name.
        name, set_name, with_name: String => "name";
        /// Yeast family.
        yeast_type, set_yeast_type, with_yeast_type: YeastType => "type";
        /// Packaging.
        form, set_form, with_form: YeastForm => "form";
    }
}

impl Element for Yeast {
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
    use crate::domain::ElementChange;
    use crate::model::ItemData;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_enum_display_names() {
        assert_eq!(FermentableType::DryExtract.to_string(), "Dry Extract");
        assert_eq!(FermentableType::from_display("dry extract"), Some(FermentableType::DryExtract));
        assert_eq!(FermentableType::from_display("Gravel"), None);
        assert_eq!(HopUse::from_display(" Dry Hop "), Some(HopUse::DryHop));
        assert_eq!(YeastForm::ALL.len(), 4);
    }

    #[test]
    fn test_setter_emits_change_descriptor() {
        let malt = Fermentable::new("Pilsner").with_amount_kg(2.0);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = seen.clone();
        malt.changed().connect(move |change: &ElementChange| {
            seen_clone.lock().push(change.clone());
        });

        malt.set_amount_kg(2.0);
        malt.set_amount_kg(4.0);
        malt.set_fermentable_type(FermentableType::Adjunct);

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].property, "amount_kg");
        assert_eq!(seen[0].value, ItemData::Float(4.0));
        assert_eq!(seen[1].value, ItemData::from("Adjunct"));
    }

    #[test]
    fn test_builders_are_silent() {
        let hop = Hop::new("Saaz")
            .with_alpha_pct(3.5)
            .with_form(HopForm::Leaf)
            .with_hop_use(HopUse::Aroma);
        assert_eq!(hop.alpha_pct(), 3.5);
        assert_eq!(hop.form(), HopForm::Leaf);
        assert_eq!(Element::name(&hop), "Saaz");
    }
}
