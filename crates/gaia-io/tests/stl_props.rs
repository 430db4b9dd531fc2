use gaia_io::{Facet, binary_stl_bytes, binary_stl_len, read_binary_stl};
use proptest::prelude::*;

fn arb_facet() -> impl Strategy<Value = Facet> {
    prop::array::uniform9(-1.0e3f32..1.0e3).prop_map(|a| Facet {
        normal: [0.0, 1.0, 0.0],
        vertices: [[a[0], a[1], a[2]], [a[3], a[4], a[5]], [a[6], a[7], a[8]]],
    })
}

proptest! {
    // File length is fully determined by the triangle count
    #[test]
    fn length_matches_count(facets in prop::collection::vec(arb_facet(), 0..64)) {
        let bytes = binary_stl_bytes("planet", &facets).unwrap();
        prop_assert_eq!(bytes.len(), 84 + 50 * facets.len());
        prop_assert_eq!(bytes.len(), binary_stl_len(facets.len()));
        let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]);
        prop_assert_eq!(count as usize, facets.len());
        prop_assert_eq!(read_binary_stl(&bytes).unwrap(), facets);
    }
}
