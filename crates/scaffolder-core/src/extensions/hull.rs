//! Dependency reachability via Warshall's transitive closure

use super::model::{Catalog, ExtensionId};

/// Square reachability matrix: `m[i][j]` means ordered extension `i` reaches `j`
pub type Matrix = Vec<Vec<bool>>;

/// `m[i][j]` is set when `ordered[i]` directly depends on `ordered[j]`.
///
/// Dependencies outside `ordered` are not represented.
pub fn build_adjacency_matrix(catalog: &Catalog, ordered: &[ExtensionId]) -> Matrix {
    ordered
        .iter()
        .map(|row| {
            let depends_on = catalog
                .get(*row)
                .map(|extension| extension.depends_on.as_slice())
                .unwrap_or_default();
            ordered
                .iter()
                .map(|column| depends_on.contains(column))
                .collect()
        })
        .collect()
}

/// Transitive closure of `matrix`, computed in place.
///
/// A cell on the diagonal is set only when the node lies on a cycle.
pub fn transitive_hull(mut matrix: Matrix) -> Matrix {
    let n = matrix.len();
    for k in 0..n {
        for i in 0..n {
            if !matrix[i][k] {
                continue;
            }
            for j in 0..n {
                if matrix[k][j] {
                    matrix[i][j] = true;
                }
            }
        }
    }
    matrix
}

/// Ids reachable from `ordered[row]` according to `hull`
pub fn reachable(hull: &Matrix, ordered: &[ExtensionId], row: usize) -> Vec<ExtensionId> {
    hull.get(row)
        .map(|cells| {
            cells
                .iter()
                .zip(ordered)
                .filter(|(cell, _)| **cell)
                .map(|(_, id)| *id)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::model::{CatalogBuilder, Category, ExtensionDef};
    use pretty_assertions::assert_eq;

    fn def(name: &str) -> ExtensionDef {
        ExtensionDef::new(name, Category::TestOnly)
    }

    #[test]
    fn test_chain_closure() {
        let catalog = CatalogBuilder::new()
            .extension(def("A"))
            .extension(def("B").depends_on("A"))
            .extension(def("C").depends_on("B"))
            .build()
            .unwrap();
        let ordered: Vec<_> = catalog.ids().collect();

        let adjacency = build_adjacency_matrix(&catalog, &ordered);
        assert_eq!(
            adjacency,
            vec![
                vec![false, false, false],
                vec![true, false, false],
                vec![false, true, false],
            ]
        );

        let hull = transitive_hull(adjacency);
        assert_eq!(
            hull,
            vec![
                vec![false, false, false],
                vec![true, false, false],
                vec![true, true, false],
            ]
        );
        assert_eq!(
            reachable(&hull, &ordered, 2),
            vec![ExtensionId(0), ExtensionId(1)]
        );
    }

    #[test]
    fn test_cycle_sets_diagonal() {
        let catalog = CatalogBuilder::new()
            .extension(def("A").depends_on("B"))
            .extension(def("B").depends_on("A"))
            .build()
            .unwrap();
        let ordered: Vec<_> = catalog.ids().collect();
        let hull = transitive_hull(build_adjacency_matrix(&catalog, &ordered));
        assert_eq!(hull, vec![vec![true, true], vec![true, true]]);
    }

    #[test]
    fn test_subset_ignores_outside_dependencies() {
        let catalog = CatalogBuilder::new()
            .extension(def("A"))
            .extension(def("B").depends_on("A"))
            .extension(def("C").depends_on("B"))
            .build()
            .unwrap();
        let ordered = vec![ExtensionId(2), ExtensionId(0)];
        let hull = transitive_hull(build_adjacency_matrix(&catalog, &ordered));
        assert_eq!(hull, vec![vec![false, false], vec![false, false]]);
    }

    #[test]
    fn test_empty_matrix() {
        assert!(transitive_hull(Vec::new()).is_empty());
    }
}
