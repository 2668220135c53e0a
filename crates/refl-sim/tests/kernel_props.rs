use proptest::prelude::*;
use refl_model::Slab;
use refl_sim::kernel::{abeles, smeared};

fn film(thick: f64, sld: f64, rough: f64) -> Vec<Slab> {
    vec![
        Slab {
            thick: 0.0,
            sld: 0.0,
            isld: 0.0,
            rough: 0.0,
        },
        Slab {
            thick,
            sld,
            isld: 0.0,
            rough,
        },
        Slab {
            thick: 0.0,
            sld: 2.07,
            isld: 0.0,
            rough,
        },
    ]
}

proptest! {
    #[test]
    fn lossless_reflectivity_is_a_probability(
        q in 0.005f64..0.5,
        thick in 0.0f64..500.0,
        sld in -0.5f64..8.0,
    ) {
        let r = abeles(&[q], &film(thick, sld, 0.0))[0];
        prop_assert!(r.is_finite());
        prop_assert!((0.0..=1.0 + 1e-9).contains(&r));
    }

    #[test]
    fn roughness_never_raises_substrate_reflectivity(
        q in 0.005f64..0.5,
        rough in 0.0f64..10.0,
    ) {
        let substrate = |rough: f64| {
            let mut slabs = film(0.0, 0.0, rough);
            slabs.remove(1);
            slabs
        };
        let smooth = abeles(&[q], &substrate(0.0))[0];
        let rough = abeles(&[q], &substrate(rough))[0];
        prop_assert!(rough <= smooth * (1.0 + 1e-9));
    }

    #[test]
    fn smearing_stays_within_the_window_extremes(
        thick in 10.0f64..300.0,
        sld in 0.5f64..6.0,
        dq in 0.5f64..8.0,
    ) {
        let slabs = film(thick, sld, 0.0);
        let q = [0.03, 0.08, 0.15];
        for value in smeared(&q, &slabs, dq) {
            prop_assert!(value.is_finite());
            prop_assert!((0.0..=1.0 + 1e-9).contains(&value));
        }
    }
}
