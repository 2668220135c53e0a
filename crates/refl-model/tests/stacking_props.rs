use proptest::prelude::*;
use refl_model::{Layer, SpinState, StackOrder, Structure};

fn arb_layer() -> impl Strategy<Value = Layer> {
    (-1.0f64..8.0, 0.0f64..300.0, 0.0f64..10.0, 0.0f64..1.0).prop_map(
        |(sld, thick, rough, vfsolv)| {
            Layer::new("layer", sld)
                .slab(thick, rough)
                .with_vfsolv(vfsolv)
        },
    )
}

proptest! {
    #[test]
    fn substrate_first_conversion_is_an_involution(layers in prop::collection::vec(arb_layer(), 2..8)) {
        let structure = Structure::from_layers("prop", layers);
        let substrate_first = structure.ordered(StackOrder::SubstrateFirst);
        let rebuilt = Structure::from_substrate_first("prop", substrate_first);
        prop_assert_eq!(rebuilt, structure);
    }

    #[test]
    fn slabs_match_layer_count(layers in prop::collection::vec(arb_layer(), 2..8)) {
        let structure = Structure::from_layers("prop", layers);
        let slabs = structure.slabs(SpinState::Unpolarised).unwrap();
        prop_assert_eq!(slabs.len(), structure.len());
        prop_assert_eq!(slabs[0].thick, 0.0);
        prop_assert_eq!(slabs[slabs.len() - 1].thick, 0.0);
    }
}
