//! Seeds an in-memory shop, rings up two sales and prints the resulting
//! manufacturing orders as JSON.

use anyhow::Context;
use rust_decimal_macros::dec;

use posmrp_core::TenantId;
use posmrp_infra::{load_settings, InMemoryBackend};
use posmrp_inventory::{Company, CompanyId, OperationType, Warehouse, WarehouseId};
use posmrp_manufacturing::{Bom, BomId, BomType};
use posmrp_products::{ProductId, UnitOfMeasure};
use posmrp_workflow::messages::render;
use posmrp_workflow::{ManufacturingOrderService, SaleFinalizationHook};

struct Shop {
    tenant_id: TenantId,
    company_id: CompanyId,
    burger: ProductId,
}

fn seed(backend: &InMemoryBackend) -> anyhow::Result<Shop> {
    let tenant_id = TenantId::new();
    let kg = UnitOfMeasure::new("kg")?;

    let company = Company::new(CompanyId::generate(), "Corner Diner")?;
    let company_id = company.id;
    backend.add_company(tenant_id, company)?;

    let warehouse = Warehouse::new(WarehouseId::generate(), company_id, "KIT", "Kitchen")?;
    let location = warehouse.stock_location_id;
    backend.add_warehouse(tenant_id, warehouse.clone())?;
    backend.set_default_warehouse(tenant_id, company_id, warehouse.id)?;
    backend.add_operation_type(tenant_id, OperationType::manufacturing(warehouse.id))?;

    let burger = backend
        .create_product(tenant_id, "BRG", "Burger", UnitOfMeasure::units())?
        .id_typed();
    backend.set_manufacture_on_sale(tenant_id, burger, true)?;
    let patty = backend.create_product(tenant_id, "PTY", "Beef", kg.clone())?.id_typed();
    let bun = backend
        .create_product(tenant_id, "BUN", "Bun", UnitOfMeasure::units())?
        .id_typed();

    let recipe = Bom::new(BomId::generate(), burger, BomType::Normal, dec!(1), UnitOfMeasure::units())?
        .add_line(patty, dec!(0.15), kg)?
        .add_line(bun, dec!(1), UnitOfMeasure::units())?;
    backend.add_bom(tenant_id, recipe)?;

    backend.adjust_stock(tenant_id, patty, location, dec!(1.5))?;
    backend.adjust_stock(tenant_id, bun, location, dec!(6))?;

    Ok(Shop {
        tenant_id,
        company_id,
        burger,
    })
}

fn main() -> anyhow::Result<()> {
    posmrp_observability::init();

    let settings = load_settings().context("invalid workflow settings")?;
    let backend = InMemoryBackend::new();
    let shop = seed(&backend).context("seeding demo data")?;
    let hook = SaleFinalizationHook::new(backend.ports(), &settings);

    // The second sale asks for more burgers than there are buns on hand.
    for (name, qty) in [("Diner/0001", dec!(4)), ("Diner/0002", dec!(9))] {
        let sale = backend.open_sale(shop.tenant_id, shop.company_id, name)?;
        let sale_id = sale.id_typed();
        backend.add_line(shop.tenant_id, sale_id, shop.burger, qty, None)?;

        match hook.process_saved_sale(shop.tenant_id, sale_id, false) {
            Ok(outcome) => {
                tracing::info!(sale = name, ?outcome, "sale processed");
                let orders: Vec<_> = backend
                    .orders_for_sale(shop.tenant_id, sale_id)?
                    .iter()
                    .filter_map(|mo| mo.values().cloned())
                    .collect();
                println!("{}", serde_json::to_string_pretty(&orders)?);
            }
            Err(err) => {
                tracing::warn!(sale = name, "sale rejected");
                println!("{}", render(&err, settings.locale));
            }
        }
    }

    Ok(())
}
