//! Presets loaded from JSON configuration.

#![cfg(feature = "serde")]

use picture_geometry::*;

#[test]
fn partial_preset_takes_defaults() {
    let preset: Preset = serde_json::from_str(
        r#"{"mode":"Loose","modulus":8,"width":1280,"pixel_aspect":[32,27]}"#,
    )
    .unwrap();
    assert_eq!(preset.mode, AnamorphicMode::Loose);
    assert_eq!(preset.modulus, Some(Modulus::Eight));
    assert_eq!(preset.width, Some(1280));
    assert_eq!(preset.pixel_aspect, Some(PixelAspect::new(32, 27)));
    assert_eq!(preset.height, None);
    assert_eq!(preset.crop, None);
    assert!(!preset.maintain_aspect_ratio);
}

#[test]
fn empty_object_is_default() {
    let preset: Preset = serde_json::from_str("{}").unwrap();
    assert_eq!(preset, Preset::default());
}

#[test]
fn unsupported_modulus_is_rejected() {
    let err = serde_json::from_str::<Preset>(r#"{"modulus":6}"#).unwrap_err();
    assert!(err.to_string().contains("invalid modulus 6"), "{err}");
}

#[test]
fn exported_preset_round_trips_through_json() {
    let mut s = PictureSettings::new();
    s.select_source(
        SourceDescriptor::new(720, 480, PixelAspect::new(32, 27)).unwrap(),
        None,
    );
    s.set_mode(AnamorphicMode::Custom);
    s.set_crop(CropEdge::Left, 8);
    let preset = s.preset();

    let json = serde_json::to_string(&preset).unwrap();
    let back: Preset = serde_json::from_str(&json).unwrap();
    assert_eq!(back, preset);

    let mut t = PictureSettings::new();
    t.select_source(
        SourceDescriptor::new(720, 480, PixelAspect::new(32, 27)).unwrap(),
        None,
    );
    t.apply_preset(&back);
    assert_eq!(t.geometry(), s.geometry());
}

#[test]
fn crop_and_par_shapes() {
    let json = serde_json::to_value(Preset {
        crop: Some(Crop::new(2, 4, 6, 8)),
        pixel_aspect: Some(PixelAspect::new(10, 11)),
        ..Preset::default()
    })
    .unwrap();
    assert_eq!(
        json["crop"],
        serde_json::json!({"top": 2, "bottom": 4, "left": 6, "right": 8})
    );
    assert_eq!(json["pixel_aspect"], serde_json::json!([10, 11]));
    assert_eq!(json["modulus"], serde_json::Value::Null);
}
