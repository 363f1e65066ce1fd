//! Bills of materials and their explosion into component requirements.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use posmrp_core::{DomainError, DomainResult, Entity, ValueObject};
use posmrp_inventory::CompanyId;
use posmrp_products::{ProductId, UnitOfMeasure};

posmrp_core::domain_id!(BomId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BomType {
    /// Manufactured through a manufacturing order.
    Normal,
    /// Kit: never manufactured itself, replaced by its components on explosion.
    Phantom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BomLine {
    pub product_id: ProductId,
    /// Quantity needed for `Bom::quantity` units of the finished product.
    pub quantity: Decimal,
    pub uom: UnitOfMeasure,
}

/// Recipe for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bom {
    pub id: BomId,
    pub product_id: ProductId,
    pub bom_type: BomType,
    /// Quantity of finished product the lines produce.
    pub quantity: Decimal,
    pub uom: UnitOfMeasure,
    /// `None` means shared by every company.
    pub company_id: Option<CompanyId>,
    /// Lower wins when several BOMs match.
    pub sequence: u32,
    pub lines: Vec<BomLine>,
}

impl Bom {
    pub fn new(
        id: BomId,
        product_id: ProductId,
        bom_type: BomType,
        quantity: Decimal,
        uom: UnitOfMeasure,
    ) -> DomainResult<Self> {
        if quantity <= Decimal::ZERO {
            return Err(DomainError::validation("BoM quantity must be positive"));
        }
        Ok(Self {
            id,
            product_id,
            bom_type,
            quantity,
            uom,
            company_id: None,
            sequence: 0,
            lines: Vec::new(),
        })
    }

    pub fn with_company(mut self, company_id: CompanyId) -> Self {
        self.company_id = Some(company_id);
        self
    }

    pub fn with_sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn add_line(
        mut self,
        product_id: ProductId,
        quantity: Decimal,
        uom: UnitOfMeasure,
    ) -> DomainResult<Self> {
        if quantity <= Decimal::ZERO {
            return Err(DomainError::validation("BoM line quantity must be positive"));
        }
        if product_id == self.product_id {
            return Err(DomainError::invariant("a BoM cannot consume its own product"));
        }
        self.lines.push(BomLine {
            product_id,
            quantity,
            uom,
        });
        Ok(self)
    }

    pub fn applies_to_company(&self, company_id: CompanyId) -> bool {
        self.company_id.is_none_or(|c| c == company_id)
    }
}

impl Entity for Bom {
    type Id = BomId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// One component needed to manufacture a given quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRequirement {
    pub product_id: ProductId,
    pub quantity: Decimal,
    pub uom: UnitOfMeasure,
}

impl ValueObject for ComponentRequirement {}

/// Explode `bom` for `quantity` units of its product.
///
/// Components that have a phantom BOM (as returned by `find_phantom`) are
/// replaced by their own components. Requirements are returned in line order,
/// depth first. A phantom chain that loops back onto a product already being
/// exploded is an error.
pub fn explode<F>(
    bom: &Bom,
    quantity: Decimal,
    mut find_phantom: F,
) -> DomainResult<Vec<ComponentRequirement>>
where
    F: FnMut(ProductId) -> Option<Bom>,
{
    let mut out = Vec::new();
    let mut path = vec![bom.product_id];
    explode_into(bom, quantity, &mut find_phantom, &mut path, &mut out)?;
    Ok(out)
}

fn explode_into<F>(
    bom: &Bom,
    quantity: Decimal,
    find_phantom: &mut F,
    path: &mut Vec<ProductId>,
    out: &mut Vec<ComponentRequirement>,
) -> DomainResult<()>
where
    F: FnMut(ProductId) -> Option<Bom>,
{
    if bom.quantity <= Decimal::ZERO {
        return Err(DomainError::validation(format!(
            "BoM {} has a non-positive quantity",
            bom.id
        )));
    }

    for line in &bom.lines {
        let line_qty = scaled_line_quantity(line.quantity, quantity, bom.quantity)?;

        match find_phantom(line.product_id).filter(|b| b.bom_type == BomType::Phantom) {
            Some(kit) => {
                if path.contains(&kit.product_id) {
                    return Err(DomainError::invariant(format!(
                        "recursive BoM detected for product {}",
                        kit.product_id
                    )));
                }
                path.push(kit.product_id);
                explode_into(&kit, line_qty, find_phantom, path, out)?;
                path.pop();
            }
            None => out.push(ComponentRequirement {
                product_id: line.product_id,
                quantity: line_qty,
                uom: line.uom.clone(),
            }),
        }
    }

    Ok(())
}

/// `line_qty * requested / produced`, multiplied first so exact ratios stay
/// exact.
fn scaled_line_quantity(
    line_qty: Decimal,
    requested: Decimal,
    produced: Decimal,
) -> DomainResult<Decimal> {
    line_qty
        .checked_mul(requested)
        .and_then(|q| q.checked_div(produced))
        .ok_or_else(|| DomainError::validation("component quantity out of range"))
}
