use chrono::Utc;

use posmrp_core::{DomainError, TenantId};
use posmrp_manufacturing::{
    ConfirmProduction, CreateProduction, ManufacturingOrder, ManufacturingOrderId,
    NewManufacturingOrder, ProductionCommand,
};
use posmrp_events::execute;
use posmrp_inventory::Warehouse;
use posmrp_sales::SaleId;
use posmrp_workflow::{BomService, ManufacturingOrderService, PortResult};

use super::{not_found, InMemoryBackend, Stored};
use crate::store::TenantStore;

impl InMemoryBackend {
    /// Warehouse recorded on the order; it must belong to the order's company
    /// and host the order's operation type, if any.
    fn production_warehouse(
        &self,
        tenant_id: TenantId,
        values: &NewManufacturingOrder,
    ) -> PortResult<Warehouse> {
        let warehouse = self
            .warehouse(tenant_id, values.warehouse_id)?
            .ok_or_else(|| not_found("warehouse", values.warehouse_id))?;
        if warehouse.company_id != values.company_id {
            return Err(DomainError::invariant(format!(
                "warehouse {} does not belong to company {}",
                warehouse.code, values.company_id
            ))
            .into());
        }

        if let Some(op_id) = values.operation_type_id {
            let op = self
                .operation_types
                .get(tenant_id, &op_id)?
                .ok_or_else(|| not_found("operation type", op_id))?;
            if op.warehouse_id != warehouse.id {
                return Err(DomainError::invariant(format!(
                    "operation type {} belongs to another warehouse",
                    op.code
                ))
                .into());
            }
        }

        Ok(warehouse)
    }

    fn load_order(
        &self,
        tenant_id: TenantId,
        production_id: ManufacturingOrderId,
    ) -> PortResult<Stored<ManufacturingOrder>> {
        self.productions
            .get(tenant_id, &production_id)?
            .ok_or_else(|| not_found("manufacturing order", production_id))
    }
}

impl ManufacturingOrderService for InMemoryBackend {
    fn create(
        &self,
        tenant_id: TenantId,
        values: NewManufacturingOrder,
    ) -> PortResult<ManufacturingOrder> {
        if self.products.get(tenant_id, &values.product_id)?.is_none() {
            return Err(not_found("product", values.product_id));
        }
        if self.boms.get(tenant_id, &values.bom_id)?.is_none() {
            return Err(not_found("BoM", values.bom_id));
        }
        self.production_warehouse(tenant_id, &values)?;

        let production_id = ManufacturingOrderId::generate();
        let mut order = ManufacturingOrder::empty(production_id);
        execute(
            &mut order,
            &ProductionCommand::CreateProduction(CreateProduction {
                tenant_id,
                production_id,
                values,
                occurred_at: Utc::now(),
            }),
        )?;

        let seq = self.next_seq();
        self.productions.upsert(
            tenant_id,
            production_id,
            Stored {
                seq,
                record: order.clone(),
            },
        )?;
        Ok(order)
    }

    fn confirm(
        &self,
        tenant_id: TenantId,
        production_id: ManufacturingOrderId,
    ) -> PortResult<ManufacturingOrder> {
        let Stored { seq, record: mut order } = self.load_order(tenant_id, production_id)?;
        execute(
            &mut order,
            &ProductionCommand::ConfirmProduction(ConfirmProduction {
                tenant_id,
                production_id,
                occurred_at: Utc::now(),
            }),
        )?;

        let values = order
            .values()
            .cloned()
            .ok_or_else(|| not_found("manufacturing order", production_id))?;
        let bom = self
            .boms
            .get(tenant_id, &values.bom_id)?
            .ok_or_else(|| not_found("BoM", values.bom_id))?
            .record;
        let location_id = self.production_warehouse(tenant_id, &values)?.stock_location_id;

        for req in self.explode(tenant_id, &bom, values.quantity)? {
            self.reserve_stock(tenant_id, req.product_id, location_id, req.quantity)?;
        }

        self.productions.upsert(
            tenant_id,
            production_id,
            Stored {
                seq,
                record: order.clone(),
            },
        )?;
        tracing::debug!(%production_id, "components reserved");
        Ok(order)
    }

    fn orders_for_sale(
        &self,
        tenant_id: TenantId,
        sale_id: SaleId,
    ) -> PortResult<Vec<ManufacturingOrder>> {
        let mut orders: Vec<_> = self
            .productions
            .list(tenant_id)?
            .into_iter()
            .filter(|s| s.record.sale_id() == Some(sale_id))
            .collect();
        orders.sort_by_key(|s| s.seq);
        Ok(orders.into_iter().map(|s| s.record).collect())
    }
}
