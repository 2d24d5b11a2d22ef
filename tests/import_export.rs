//! Round trip through the only reverse path in the system: foreign
//! stylesheet text -> IR -> generated stylesheet.

use motionforge::{AnimationConfig, Format, GenerateRequest, generate, parse_keyframes};

const FOREIGN: &str = r"
    @keyframes slide-fade {
      0% {
        opacity: 0;
        transform: translateX(-40px) scale(0.8);
      }
      60% {
        opacity: 1;
        transform: translateX(8px) scale(1.02);
      }
      100% {
        transform: translateX(0px);
      }
    }
";

#[test]
fn imported_keyframes_regenerate_their_properties() {
    let keyframes = parse_keyframes(FOREIGN).unwrap();
    assert_eq!(keyframes.len(), 3);

    let config = AnimationConfig {
        name: "slide-fade".to_string(),
        keyframes,
        ..AnimationConfig::default()
    };
    config.validate().unwrap();

    let out = generate(Format::StylesheetKeyframes, &GenerateRequest::new(&config)).unwrap();
    assert!(out.contains("@keyframes slide-fade"));
    assert!(out.contains("60% {"));
    assert!(out.contains("translateX(-40px) scale(0.8)"));
    assert!(out.contains("translateX(8px) scale(1.02)"));
}

#[test]
fn imported_keyframes_drive_every_backend() {
    let keyframes = parse_keyframes(FOREIGN).unwrap();
    let config = AnimationConfig {
        name: "slide-fade".to_string(),
        keyframes,
        ..AnimationConfig::default()
    };
    for format in Format::ALL {
        assert!(
            generate(format, &GenerateRequest::new(&config)).is_ok(),
            "{format} failed on imported keyframes"
        );
    }
}

#[test]
fn import_rejects_what_it_cannot_represent() {
    let matrix = "@keyframes m { 0% { transform: matrix(1, 0, 0, 1, 0, 0); } 100% { opacity: 1; } }";
    assert!(parse_keyframes(matrix).is_err());

    let single = "@keyframes s { 50% { opacity: 0.5; } }";
    assert!(parse_keyframes(single).is_err());
}
