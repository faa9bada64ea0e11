use super::*;

use crate::foundation::error::InvalidConfigReason;

fn constant(rgba: [f32; 4]) -> Box<ShaderNode> {
    Box::new(ShaderNode::Constant { rgba })
}

fn approx(a: [f32; 4], b: [f32; 4]) -> bool {
    a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5)
}

#[test]
fn parses_material_json() {
    let m = Material::from_json_str(
        r#"{ "name": "M_Rock", "graph": { "noise": { "seed": 7, "scale": 16.0 } } }"#,
    )
    .unwrap();
    assert_eq!(m.source_name(), "M_Rock");
    assert_eq!(
        m.graph,
        ShaderNode::Noise {
            seed: 7,
            scale: 16.0
        }
    );

    let uv = Material::from_json_str(r#"{ "name": "M_UV", "graph": "tex_coord" }"#).unwrap();
    assert_eq!(uv.graph, ShaderNode::TexCoord);
}

#[test]
fn radial_defaults_apply() {
    let m = Material::from_json_str(
        r#"{ "name": "M_Glow", "graph": { "radial_gradient": {
            "inner": [1, 1, 1, 1], "outer": [0, 0, 0, 1] } } }"#,
    )
    .unwrap();
    let ShaderNode::RadialGradient { center, radius, .. } = m.graph else {
        panic!("expected radial gradient");
    };
    assert_eq!(center, [0.5, 0.5]);
    assert_eq!(radius, 0.5);
}

#[test]
fn rejects_malformed_json() {
    assert!(matches!(
        Material::from_json_str("{ not json"),
        Err(BakeError::Other(_))
    ));
}

#[test]
fn rejects_unusable_parameters() {
    let empty_name = Material::new(" ", ShaderNode::TexCoord);
    assert!(matches!(
        empty_name.validate(),
        Err(BakeError::InvalidConfig(InvalidConfigReason::InvalidSettings(_)))
    ));

    let nested = Material::new(
        "M_Bad",
        ShaderNode::Multiply {
            a: constant([1.0; 4]),
            b: Box::new(ShaderNode::Checker {
                cells: 0,
                a: [0.0; 4],
                b: [1.0; 4],
            }),
        },
    );
    assert!(nested.validate().is_err());

    let noise = ShaderNode::Noise {
        seed: 1,
        scale: f32::NAN,
    };
    assert!(noise.validate().is_err());
}

#[test]
fn linear_gradient_spans_the_quad() {
    let g = ShaderNode::LinearGradient {
        from: [0.0, 0.0, 0.0, 1.0],
        to: [1.0, 1.0, 1.0, 1.0],
        angle_deg: 0.0,
    };
    assert!(approx(g.eval(0.0, 0.5), [0.0, 0.0, 0.0, 1.0]));
    assert!(approx(g.eval(1.0, 0.5), [1.0, 1.0, 1.0, 1.0]));
    assert!(approx(g.eval(0.5, 0.1), [0.5, 0.5, 0.5, 1.0]));

    let vertical = ShaderNode::LinearGradient {
        from: [0.0; 4],
        to: [1.0; 4],
        angle_deg: 90.0,
    };
    assert!(approx(vertical.eval(0.3, 1.0), [1.0; 4]));
}

#[test]
fn radial_gradient_blends_by_distance() {
    let g = ShaderNode::RadialGradient {
        inner: [1.0, 0.0, 0.0, 1.0],
        outer: [0.0, 0.0, 1.0, 1.0],
        center: [0.5, 0.5],
        radius: 0.5,
    };
    assert!(approx(g.eval(0.5, 0.5), [1.0, 0.0, 0.0, 1.0]));
    assert!(approx(g.eval(0.0, 0.0), [0.0, 0.0, 1.0, 1.0]));
}

#[test]
fn checker_alternates_cells() {
    let g = ShaderNode::Checker {
        cells: 2,
        a: [1.0; 4],
        b: [0.0; 4],
    };
    assert_eq!(g.eval(0.1, 0.1), [1.0; 4]);
    assert_eq!(g.eval(0.6, 0.1), [0.0; 4]);
    assert_eq!(g.eval(0.6, 0.6), [1.0; 4]);
}

#[test]
fn noise_is_deterministic_and_bounded() {
    let a = ShaderNode::Noise {
        seed: 3,
        scale: 8.0,
    };
    let b = ShaderNode::Noise {
        seed: 4,
        scale: 8.0,
    };
    let points = [(0.1, 0.2), (0.37, 0.81), (0.9, 0.45), (0.52, 0.07)];
    for &(u, v) in &points {
        let x = a.eval(u, v);
        assert_eq!(x, a.eval(u, v));
        assert!((0.0..=1.0).contains(&x[0]));
        assert_eq!(x[3], 1.0);
    }
    assert!(points.iter().any(|&(u, v)| a.eval(u, v) != b.eval(u, v)));
}

#[test]
fn noise_survives_extreme_scales() {
    for scale in [1e30, f32::MAX] {
        let g = ShaderNode::Noise { seed: 1, scale };
        g.validate().unwrap();
        for &(u, v) in &[(0.0, 0.0), (0.5, 0.5), (1.0, 1.0)] {
            let x = g.eval(u, v);
            assert!((0.0..=1.0).contains(&x[0]), "{scale} at ({u}, {v})");
        }
    }
}

#[test]
fn combinators_compose_children() {
    let mix = ShaderNode::Mix {
        a: constant([0.0, 0.0, 0.0, 1.0]),
        b: constant([1.0, 2.0, 4.0, 1.0]),
        factor: constant([0.25, 0.0, 0.0, 0.0]),
    };
    assert!(approx(mix.eval(0.5, 0.5), [0.25, 0.5, 1.0, 1.0]));

    let mul = ShaderNode::Multiply {
        a: constant([0.5, 0.5, 0.5, 1.0]),
        b: Box::new(ShaderNode::TexCoord),
    };
    assert!(approx(mul.eval(0.5, 1.0), [0.25, 0.5, 0.0, 1.0]));

    let add = ShaderNode::Add {
        a: constant([0.75, 0.0, 0.0, 1.0]),
        b: constant([0.75, 0.0, 0.0, 1.0]),
    };
    assert_eq!(add.eval(0.0, 0.0), [1.5, 0.0, 0.0, 2.0]);
}
