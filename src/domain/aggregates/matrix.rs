//! Comparison Matrix

use rust_decimal::Decimal;
use serde::Serialize;
use crate::domain::aggregates::snapshot::ProductSnapshot;
use crate::domain::value_objects::{CellValue, ProductId};

/// Row-per-attribute, column-per-product comparison result.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ComparisonMatrix {
    products: Vec<ProductSnapshot>,
    attributes: Vec<String>,
    best_price_id: Option<ProductId>,
}

/// One attribute row, cells in product order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatrixRow {
    pub label: String,
    pub cells: Vec<CellValue>,
}

impl ComparisonMatrix {
    /// Snapshots must already be in display order.
    pub fn from_snapshots(products: Vec<ProductSnapshot>) -> Self {
        let mut attributes: Vec<String> = vec![];
        for label in products.iter().flat_map(|p| p.attributes.labels()) {
            if !attributes.iter().any(|a| a == label) {
                attributes.push(label.to_string());
            }
        }
        let best_price_id = best_price(&products);
        Self { products, attributes, best_price_id }
    }

    pub fn products(&self) -> &[ProductSnapshot] { &self.products }
    pub fn attributes(&self) -> &[String] { &self.attributes }
    pub fn best_price_id(&self) -> Option<ProductId> { self.best_price_id }
    pub fn len(&self) -> usize { self.products.len() }
    pub fn is_empty(&self) -> bool { self.products.is_empty() }
    pub fn into_products(self) -> Vec<ProductSnapshot> { self.products }

    pub fn is_best_price(&self, id: ProductId) -> bool { self.best_price_id == Some(id) }

    pub fn cell(&self, product: usize, label: &str) -> CellValue {
        CellValue::classify(self.products.get(product).and_then(|p| p.attributes.get(label)))
    }

    pub fn rows(&self) -> Vec<MatrixRow> {
        self.attributes.iter().map(|label| MatrixRow {
            label: label.clone(),
            cells: (0..self.products.len()).map(|i| self.cell(i, label)).collect(),
        }).collect()
    }
}

/// Lowest strictly-positive price, first seen on ties; needs two priced products.
fn best_price(products: &[ProductSnapshot]) -> Option<ProductId> {
    let priced: Vec<&ProductSnapshot> = products.iter().filter(|p| p.has_positive_price()).collect();
    if priced.len() < 2 { return None; }
    let mut best: Option<(Decimal, ProductId)> = None;
    for p in priced {
        match best {
            Some((price, _)) if p.price >= price => {}
            _ => best = Some((p.price, p.id)),
        }
    }
    best.map(|(_, id)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DeclaredAttribute, ProductView};

    fn snap(id: u64, price: i64, attrs: &[(&str, &str)]) -> ProductSnapshot {
        let mut view = ProductView::named(ProductId::new(id).unwrap(), format!("P{}", id), Decimal::new(price, 0));
        view.attributes = attrs.iter().map(|(n, v)| DeclaredAttribute::Custom { name: n.to_string(), options: vec![v.to_string()] }).collect();
        ProductSnapshot::build(view, vec![])
    }

    fn pid(v: u64) -> ProductId { ProductId::new(v).unwrap() }

    #[test]
    fn test_attribute_union_first_seen() {
        let m = ComparisonMatrix::from_snapshots(vec![
            snap(1, 10, &[("Color", "Red")]),
            snap(2, 20, &[("Size", "Large"), ("Color", "Blue")]),
        ]);
        assert_eq!(m.attributes(), &["Color".to_string(), "Size".to_string()]);
        assert_eq!(m.cell(0, "Size"), CellValue::Absent);
        assert_eq!(m.cell(1, "Color"), CellValue::Text("Blue".into()));
        assert_eq!(m.cell(5, "Color"), CellValue::Absent);
    }

    #[test]
    fn test_best_price_tie_goes_to_first() {
        let m = ComparisonMatrix::from_snapshots(vec![snap(1, 100, &[]), snap(2, 100, &[]), snap(3, 150, &[])]);
        assert_eq!(m.best_price_id(), Some(pid(1)));
        assert!(!m.is_best_price(pid(2)));
    }

    #[test]
    fn test_best_price_ignores_zero_prices() {
        let m = ComparisonMatrix::from_snapshots(vec![snap(1, 0, &[]), snap(2, 80, &[]), snap(3, 50, &[])]);
        assert_eq!(m.best_price_id(), Some(pid(3)));
    }

    #[test]
    fn test_best_price_needs_two_priced() {
        assert_eq!(ComparisonMatrix::from_snapshots(vec![snap(1, 100, &[])]).best_price_id(), None);
        assert_eq!(ComparisonMatrix::from_snapshots(vec![snap(1, 100, &[]), snap(2, 0, &[])]).best_price_id(), None);
        assert_eq!(ComparisonMatrix::from_snapshots(vec![]).best_price_id(), None);
    }

    #[test]
    fn test_rows() {
        let m = ComparisonMatrix::from_snapshots(vec![
            snap(1, 10, &[("Hub Required", "yes")]),
            snap(2, 20, &[("Hub Required", "no")]),
            snap(3, 30, &[]),
        ]);
        assert_eq!(m.rows(), vec![MatrixRow {
            label: "Hub Required".into(),
            cells: vec![CellValue::Affirmative, CellValue::Negative, CellValue::Absent],
        }]);
    }
}
