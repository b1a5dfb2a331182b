use crate::shared::*;

/// Populate the CropRegistry with all crop definitions.
///
/// Growth ticks per stage (seed → growing, growing → ready):
///   wheat 3 / 5, carrot 4 / 8, spinach 2 / 4
pub fn populate_crops(registry: &mut CropRegistry) {
    let crops = [
        CropDef {
            kind: CropKind::Wheat,
            name: "Wheat".into(),
            sprout_ticks: 3,
            mature_ticks: 5,
            sell_price: 2,
        },
        CropDef {
            kind: CropKind::Carrot,
            name: "Carrot".into(),
            sprout_ticks: 4,
            mature_ticks: 8,
            sell_price: 4,
        },
        CropDef {
            kind: CropKind::Spinach,
            name: "Spinach".into(),
            sprout_ticks: 2,
            mature_ticks: 4,
            sell_price: 3,
        },
    ];

    for def in crops {
        registry.crops.insert(def.kind, def);
    }
}
