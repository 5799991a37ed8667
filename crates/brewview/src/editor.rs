//! Headless mash editor.
//!
//! `MashEditor` holds the text of a mash form bound to one [`Mash`]. It keeps
//! the form in step with the mash: a change to one mash field refreshes only
//! that field of the form, so text the user is typing elsewhere survives.
//! [`save`](MashEditor::save) parses the form back into the mash.
//!
//! ```
//! use std::sync::Arc;
//! use brewview::domain::Mash;
//! use brewview::editor::{MashEditor, MashField};
//!
//! let editor = MashEditor::new();
//! let mash = Arc::new(Mash::new("Single Infusion"));
//! editor.set_mash(Some(mash.clone()));
//!
//! editor.set_field(MashField::GrainTemp, "18 C");
//! assert!(editor.save());
//! assert_eq!(mash.grain_temp_c(), 18.0);
//! assert!(mash.equip_adjust());
//! ```

use std::sync::{Arc, Weak};

use brewview_core::logging::targets;
use brewview_core::{
    ConnectionId, Diagnostic, DiagnosticKind, Diagnostics, Signal, default_diagnostics,
};
use parking_lot::Mutex;

use crate::domain::{Element, ElementChange, Equipment, Mash};
use crate::units::{DisplayFormatter, Quantity, UnitFormatter};

/// One input of the mash form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MashField {
    /// Mash name.
    Name,
    /// Grain temperature.
    GrainTemp,
    /// Sparge water temperature.
    SpargeTemp,
    /// Sparge water pH.
    Ph,
    /// Tun temperature.
    TunTemp,
    /// Tun mass.
    TunWeight,
    /// Tun specific heat.
    TunSpecificHeat,
    /// Free-form notes.
    Notes,
}

impl MashField {
    /// Every field, in form order.
    pub const ALL: [MashField; 8] = [
        MashField::Name,
        MashField::GrainTemp,
        MashField::SpargeTemp,
        MashField::Ph,
        MashField::TunTemp,
        MashField::TunWeight,
        MashField::TunSpecificHeat,
        MashField::Notes,
    ];

    /// The mash property this field edits.
    pub fn property(&self) -> &'static str {
        match self {
            MashField::Name => "name",
            MashField::GrainTemp => "grain_temp_c",
            MashField::SpargeTemp => "sparge_temp_c",
            MashField::Ph => "ph",
            MashField::TunTemp => "tun_temp_c",
            MashField::TunWeight => "tun_weight_kg",
            MashField::TunSpecificHeat => "tun_specific_heat_cal_gc",
            MashField::Notes => "notes",
        }
    }

    /// The field editing `property`, if any.
    pub fn from_property(property: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.property() == property)
    }

    fn quantity(&self) -> Option<Quantity> {
        match self {
            MashField::Name | MashField::Notes => None,
            MashField::GrainTemp | MashField::SpargeTemp | MashField::TunTemp => {
                Some(Quantity::Temperature)
            }
            MashField::TunWeight => Some(Quantity::Mass),
            MashField::Ph | MashField::TunSpecificHeat => Some(Quantity::Plain),
        }
    }
}

/// The form's text, one string per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MashForm {
    /// Mash name.
    pub name: String,
    /// Grain temperature.
    pub grain_temp: String,
    /// Sparge water temperature.
    pub sparge_temp: String,
    /// Sparge water pH.
    pub ph: String,
    /// Tun temperature.
    pub tun_temp: String,
    /// Tun mass.
    pub tun_weight: String,
    /// Tun specific heat.
    pub tun_specific_heat: String,
    /// Notes.
    pub notes: String,
}

impl MashForm {
    /// The text of one field.
    pub fn get(&self, field: MashField) -> &str {
        match field {
            MashField::Name => &self.name,
            MashField::GrainTemp => &self.grain_temp,
            MashField::SpargeTemp => &self.sparge_temp,
            MashField::Ph => &self.ph,
            MashField::TunTemp => &self.tun_temp,
            MashField::TunWeight => &self.tun_weight,
            MashField::TunSpecificHeat => &self.tun_specific_heat,
            MashField::Notes => &self.notes,
        }
    }

    fn get_mut(&mut self, field: MashField) -> &mut String {
        match field {
            MashField::Name => &mut self.name,
            MashField::GrainTemp => &mut self.grain_temp,
            MashField::SpargeTemp => &mut self.sparge_temp,
            MashField::Ph => &mut self.ph,
            MashField::TunTemp => &mut self.tun_temp,
            MashField::TunWeight => &mut self.tun_weight,
            MashField::TunSpecificHeat => &mut self.tun_specific_heat,
            MashField::Notes => &mut self.notes,
        }
    }
}

#[derive(Default)]
struct EditorState {
    mash: Option<(Arc<Mash>, ConnectionId)>,
    equipment: Option<Arc<Equipment>>,
    form: MashForm,
}

/// Values parsed out of the form, ready to apply.
struct ParsedMash {
    name: String,
    grain_temp_c: Option<f64>,
    sparge_temp_c: Option<f64>,
    ph: Option<f64>,
    tun_temp_c: Option<f64>,
    tun_weight_kg: Option<f64>,
    tun_specific_heat_cal_gc: Option<f64>,
    notes: String,
}

/// Editor state for one mash.
pub struct MashEditor {
    state: Mutex<EditorState>,
    formatter: Arc<dyn UnitFormatter>,
    diagnostics: Arc<dyn Diagnostics>,
    form_changed: Signal<Option<MashField>>,
    self_ref: Weak<Self>,
}

impl MashEditor {
    /// Creates an editor with the default formatter and diagnostics.
    pub fn new() -> Arc<Self> {
        Self::with_parts(Arc::new(DisplayFormatter::default()), default_diagnostics())
    }

    /// Creates an editor from explicit collaborators.
    pub fn with_parts(
        formatter: Arc<dyn UnitFormatter>,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            state: Mutex::new(EditorState::default()),
            formatter,
            diagnostics,
            form_changed: Signal::new(),
            self_ref: self_ref.clone(),
        })
    }

    /// Emitted after the form text changes: the field, or `None` for all.
    pub fn form_changed(&self) -> &Signal<Option<MashField>> {
        &self.form_changed
    }

    /// The mash being edited.
    pub fn mash(&self) -> Option<Arc<Mash>> {
        self.state.lock().mash.as_ref().map(|(mash, _)| mash.clone())
    }

    /// The equipment tun values can be copied from.
    pub fn equipment(&self) -> Option<Arc<Equipment>> {
        self.state.lock().equipment.clone()
    }

    /// A copy of the form text.
    pub fn form(&self) -> MashForm {
        self.state.lock().form.clone()
    }

    /// Binds the editor to `mash` and refreshes the whole form.
    ///
    /// The previous mash, if any, is no longer observed. `None` unbinds and
    /// clears the form.
    pub fn set_mash(&self, mash: Option<Arc<Mash>>) {
        let previous = self.state.lock().mash.take();
        if let Some((old, connection)) = previous {
            old.changed().disconnect(connection);
        }

        if let Some(mash) = mash {
            let editor = self.self_ref.clone();
            let connection = mash.changed().connect(move |change: &ElementChange| {
                if let Some(editor) = editor.upgrade() {
                    editor.show_changes(Some(change.property));
                }
            });
            self.state.lock().mash = Some((mash, connection));
        }
        self.show_changes(None);
    }

    /// Sets the equipment used by [`from_equipment`](Self::from_equipment).
    ///
    /// `None` is ignored and keeps the current equipment.
    pub fn set_equipment(&self, equipment: Option<Arc<Equipment>>) {
        if let Some(equipment) = equipment {
            self.state.lock().equipment = Some(equipment);
        }
    }

    /// Replaces the text of one field, as if typed by the user.
    pub fn set_field(&self, field: MashField, text: impl Into<String>) {
        *self.state.lock().form.get_mut(field) = text.into();
        self.form_changed.emit(Some(field));
    }

    fn render(&self, mash: &Mash, field: MashField) -> String {
        let value = match field {
            MashField::Name => return mash.name(),
            MashField::Notes => return mash.notes(),
            MashField::GrainTemp => mash.grain_temp_c(),
            MashField::SpargeTemp => mash.sparge_temp_c(),
            MashField::Ph => mash.ph(),
            MashField::TunTemp => mash.tun_temp_c(),
            MashField::TunWeight => mash.tun_weight_kg(),
            MashField::TunSpecificHeat => mash.tun_specific_heat_cal_gc(),
        };
        let quantity = field.quantity().unwrap_or(Quantity::Plain);
        self.formatter.display_amount(quantity, value)
    }

    /// Refreshes the form from the mash.
    ///
    /// With a property name only the matching field is refreshed; properties
    /// the form does not show are ignored. With `None` every field is
    /// refreshed. Without a mash the form is cleared.
    pub fn show_changes(&self, property: Option<&str>) {
        let Some(mash) = self.mash() else {
            self.clear();
            return;
        };

        let fields: Vec<MashField> = match property {
            None => MashField::ALL.to_vec(),
            Some(property) => match MashField::from_property(property) {
                Some(field) => vec![field],
                None => return,
            },
        };

        let rendered: Vec<(MashField, String)> = fields
            .into_iter()
            .map(|field| (field, self.render(&mash, field)))
            .collect();
        {
            let mut state = self.state.lock();
            for (field, text) in rendered {
                *state.form.get_mut(field) = text;
            }
        }

        let changed = match property {
            None => None,
            Some(property) => MashField::from_property(property),
        };
        self.form_changed.emit(changed);
    }

    fn parse(&self, field: MashField, text: &str) -> Option<f64> {
        let quantity = field.quantity()?;
        let parsed = self.formatter.parse_amount(quantity, text);
        if parsed.is_none() {
            self.diagnostics.report(Diagnostic::new(
                "MashEditor::save",
                DiagnosticKind::Rejected,
                format!("{} '{text}'", field.property()),
            ));
        }
        parsed
    }

    /// Writes the form into the mash.
    ///
    /// Turns on equipment adjustment. Fields whose text does not parse are
    /// reported and left unchanged on the mash. Returns `false` without a
    /// mash, or if any field was rejected.
    pub fn save(&self) -> bool {
        let Some(mash) = self.mash() else {
            return false;
        };
        let form = self.form();

        let parsed = ParsedMash {
            name: form.name.trim().to_string(),
            grain_temp_c: self.parse(MashField::GrainTemp, &form.grain_temp),
            sparge_temp_c: self.parse(MashField::SpargeTemp, &form.sparge_temp),
            ph: self.parse(MashField::Ph, &form.ph),
            tun_temp_c: self.parse(MashField::TunTemp, &form.tun_temp),
            tun_weight_kg: self.parse(MashField::TunWeight, &form.tun_weight),
            tun_specific_heat_cal_gc: self
                .parse(MashField::TunSpecificHeat, &form.tun_specific_heat),
            notes: form.notes,
        };
        let complete = [
            parsed.grain_temp_c,
            parsed.sparge_temp_c,
            parsed.ph,
            parsed.tun_temp_c,
            parsed.tun_weight_kg,
            parsed.tun_specific_heat_cal_gc,
        ]
        .iter()
        .all(Option::is_some);

        mash.set_equip_adjust(true);
        mash.set_name(parsed.name);
        if let Some(v) = parsed.grain_temp_c {
            mash.set_grain_temp_c(v);
        }
        if let Some(v) = parsed.sparge_temp_c {
            mash.set_sparge_temp_c(v);
        }
        if let Some(v) = parsed.ph {
            mash.set_ph(v);
        }
        if let Some(v) = parsed.tun_temp_c {
            mash.set_tun_temp_c(v);
        }
        if let Some(v) = parsed.tun_weight_kg {
            mash.set_tun_weight_kg(v);
        }
        if let Some(v) = parsed.tun_specific_heat_cal_gc {
            mash.set_tun_specific_heat_cal_gc(v);
        }
        mash.set_notes(parsed.notes);

        tracing::debug!(target: targets::EDITOR, mash = %mash.name(), complete, "saved mash form");
        complete
    }

    /// Copies the tun mass and specific heat of the equipment into the form.
    ///
    /// Returns `false` if there is no mash or no equipment.
    pub fn from_equipment(&self) -> bool {
        let (equipment, has_mash) = {
            let state = self.state.lock();
            (state.equipment.clone(), state.mash.is_some())
        };
        let Some(equipment) = equipment.filter(|_| has_mash) else {
            return false;
        };

        let weight = self
            .formatter
            .display_amount(Quantity::Mass, equipment.tun_weight_kg());
        let specific_heat = self
            .formatter
            .display_amount(Quantity::Plain, equipment.tun_specific_heat_cal_gc());
        {
            let mut state = self.state.lock();
            state.form.tun_weight = weight;
            state.form.tun_specific_heat = specific_heat;
        }
        tracing::debug!(
            target: targets::EDITOR,
            equipment = %equipment.name(),
            "copied tun from equipment"
        );
        self.form_changed.emit(None);
        true
    }

    /// Blanks every field.
    pub fn clear(&self) {
        self.state.lock().form = MashForm::default();
        self.form_changed.emit(None);
    }
}

impl Drop for MashEditor {
    fn drop(&mut self) {
        if let Some((mash, connection)) = self.state.get_mut().mash.take() {
            mash.changed().disconnect(connection);
        }
    }
}

impl std::fmt::Debug for MashEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MashEditor")
            .field("mash", &state.mash.as_ref().map(|(m, _)| m.name()))
            .field("form", &state.form)
            .finish()
    }
}

static_assertions::assert_impl_all!(MashEditor: Send, Sync);
