//! Building envelope from house type, floor count and any explicit plot size.

use crate::domain::{Dimensions, HouseType};

use super::keywords::KeywordTable;

/// Envelope used when the table has no entry for a house type.
pub const FALLBACK_DIMENSIONS: Dimensions = Dimensions {
    width: 10.0,
    length: 8.0,
    height: 8.0,
};

/// Tabulated heights describe a two-floor reference building.
const REFERENCE_FLOORS: f64 = 2.0;

pub fn resolve(
    table: &KeywordTable,
    house_type: HouseType,
    floors: u8,
    hint: Option<(f64, f64)>,
) -> Dimensions {
    let base = table
        .house_type(house_type)
        .base_dimensions
        .unwrap_or(FALLBACK_DIMENSIONS);

    let (width, length) = hint.unwrap_or((base.width, base.length));
    let height = base.height * f64::from(floors) / REFERENCE_FLOORS;

    Dimensions::new(width, length, height).clamped()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MAX_DIMENSION;
    use approx::assert_abs_diff_eq;

    #[test]
    fn height_scales_with_floors() {
        let table = KeywordTable::builtin();
        let dims = resolve(table, HouseType::Villa, 2, None);
        assert_eq!(dims, Dimensions::new(15.0, 12.0, 12.0));

        let dims = resolve(table, HouseType::Villa, 4, None);
        assert_abs_diff_eq!(dims.height, 24.0);

        let dims = resolve(table, HouseType::Villa, 1, None);
        assert_abs_diff_eq!(dims.height, 6.0);
    }

    #[test]
    fn hint_overrides_footprint_only() {
        let dims = resolve(KeywordTable::builtin(), HouseType::Bungalow, 2, Some((12.192, 18.288)));
        assert_abs_diff_eq!(dims.width, 12.192);
        assert_abs_diff_eq!(dims.length, 18.288);
        assert_abs_diff_eq!(dims.height, 4.0);
    }

    #[test]
    fn missing_table_entry_uses_fallback() {
        let dims = resolve(&KeywordTable::default(), HouseType::Palace, 2, None);
        assert_eq!(dims, FALLBACK_DIMENSIONS);
    }

    #[test]
    fn huge_hints_are_bounded() {
        let dims = resolve(KeywordTable::builtin(), HouseType::Villa, 2, Some((1e308, f64::INFINITY)));
        assert_eq!(dims.width, MAX_DIMENSION);
        assert_eq!(dims.length, MAX_DIMENSION);
        assert_abs_diff_eq!(dims.height, 12.0);
    }

    #[test]
    fn degenerate_hints_are_clamped() {
        let dims = resolve(KeywordTable::builtin(), HouseType::Cottage, 1, Some((0.0, -4.0)));
        assert_eq!(dims.width, 1.0);
        assert_eq!(dims.length, 1.0);
        assert_abs_diff_eq!(dims.height, 3.0);
    }
}
