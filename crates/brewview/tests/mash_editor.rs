//! Integration tests for the mash editor driven by a view configuration.

use std::sync::Arc;

use brewview::config::ViewConfig;
use brewview::domain::{Equipment, Mash};
use brewview::editor::{MashEditor, MashField};
use brewview::units::UnitSystem;
use brewview::{DiagnosticKind, RecordingDiagnostics};

fn imperial_editor() -> (Arc<MashEditor>, Arc<RecordingDiagnostics>) {
    let config = ViewConfig::from_toml_str(
        r#"
        unit_system = "imperial"
        precision = 1
        "#,
    )
    .unwrap();
    assert_eq!(config.unit_system, UnitSystem::Imperial);

    let sink = Arc::new(RecordingDiagnostics::new());
    let editor = MashEditor::with_parts(Arc::new(config.formatter()), sink.clone());
    (editor, sink)
}

#[test]
fn test_form_uses_configured_units() {
    let (editor, _) = imperial_editor();
    let mash = Arc::new(Mash::new("Infusion").with_sparge_temp_c(100.0));
    editor.set_mash(Some(mash.clone()));
    assert_eq!(editor.form().sparge_temp, "212.0 F");

    editor.set_field(MashField::SpargeTemp, "170");
    assert!(editor.save());
    assert!((mash.sparge_temp_c() - 76.666_666).abs() < 1e-4);
    assert_eq!(editor.form().sparge_temp, "170.0 F");
}

#[test]
fn test_only_changed_field_is_refreshed() {
    let (editor, _) = imperial_editor();
    let mash = Arc::new(Mash::new("Infusion"));
    editor.set_mash(Some(mash.clone()));

    editor.set_field(MashField::Name, "Half-typed na");
    editor.set_field(MashField::Ph, "5.");
    mash.set_tun_temp_c(0.0);

    let form = editor.form();
    assert_eq!(form.tun_temp, "32.0 F");
    assert_eq!(form.name, "Half-typed na");
    assert_eq!(form.ph, "5.");

    mash.set_equip_adjust(true);
    assert_eq!(editor.form().name, "Half-typed na");
}

#[test]
fn test_equipment_then_save() {
    let (editor, sink) = imperial_editor();
    let mash = Arc::new(Mash::new("Infusion"));
    let cooler = Arc::new(
        Equipment::new("Cooler")
            .with_tun_weight_kg(1.0)
            .with_tun_specific_heat_cal_gc(0.3),
    );

    editor.set_equipment(Some(cooler));
    assert!(!editor.from_equipment());

    editor.set_mash(Some(mash.clone()));
    assert!(editor.from_equipment());
    assert_eq!(editor.form().tun_weight, "2.2 lb");

    editor.set_field(MashField::TunWeight, "4 lb");
    editor.set_field(MashField::GrainTemp, "cold");
    assert!(!editor.save());
    assert_eq!(sink.count_of(DiagnosticKind::Rejected), 1);
    assert!((mash.tun_weight_kg() - 1.814_369).abs() < 1e-5);
    assert_eq!(mash.tun_specific_heat_cal_gc(), 0.3);
    assert!(mash.equip_adjust());
}

#[test]
fn test_clear_and_unbind() {
    let (editor, _) = imperial_editor();
    let mash = Arc::new(Mash::new("Infusion").with_notes("Stir well".into()));
    editor.set_mash(Some(mash.clone()));
    assert_eq!(editor.form().notes, "Stir well");

    editor.set_mash(None);
    assert!(editor.mash().is_none());
    assert!(editor.form().notes.is_empty());

    mash.set_notes("Changed later".into());
    assert!(editor.form().notes.is_empty());
}
