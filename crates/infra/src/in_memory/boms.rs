use rust_decimal::Decimal;

use posmrp_core::TenantId;
use posmrp_inventory::CompanyId;
use posmrp_manufacturing::{explode, Bom, BomType, ComponentRequirement};
use posmrp_products::ProductId;
use posmrp_workflow::{BomService, PortResult};

use super::{not_found, InMemoryBackend, Stored};
use crate::store::TenantStore;

impl InMemoryBackend {
    /// Register a BoM. Its product must exist.
    pub fn add_bom(&self, tenant_id: TenantId, bom: Bom) -> PortResult<()> {
        if self.products.get(tenant_id, &bom.product_id)?.is_none() {
            return Err(not_found("product", bom.product_id));
        }
        let seq = self.next_seq();
        self.boms.upsert(tenant_id, bom.id, Stored { seq, record: bom })
    }

    /// Lowest sequence wins; ties go to the BoM registered first.
    fn best_bom(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
        bom_type: BomType,
        company_id: Option<CompanyId>,
    ) -> PortResult<Option<Bom>> {
        Ok(self
            .boms
            .list(tenant_id)?
            .into_iter()
            .filter(|s| s.record.product_id == product_id && s.record.bom_type == bom_type)
            .filter(|s| company_id.is_none_or(|c| s.record.applies_to_company(c)))
            .min_by_key(|s| (s.record.sequence, s.seq))
            .map(|s| s.record))
    }
}

impl BomService for InMemoryBackend {
    fn find_bom(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
        bom_type: BomType,
        company_id: CompanyId,
    ) -> PortResult<Option<Bom>> {
        self.best_bom(tenant_id, product_id, bom_type, Some(company_id))
    }

    fn explode(
        &self,
        tenant_id: TenantId,
        bom: &Bom,
        quantity: Decimal,
    ) -> PortResult<Vec<ComponentRequirement>> {
        let mut lookup_error = None;
        let requirements = explode(bom, quantity, |component| {
            match self.best_bom(tenant_id, component, BomType::Phantom, bom.company_id) {
                Ok(found) => found,
                Err(e) => {
                    lookup_error.get_or_insert(e);
                    None
                }
            }
        })?;
        match lookup_error {
            Some(e) => Err(e),
            None => Ok(requirements),
        }
    }
}
