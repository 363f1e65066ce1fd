//! Integration tests for the sale → manufacturing pipeline.
//!
//! Tests: SaleFinalizationHook → validation → order creation → confirmation,
//! all against the in-memory backend.
//!
//! Verifies:
//! - Only positive, flagged lines produce orders
//! - Any validation failure rolls back the sale and every order
//! - Re-running the hook never duplicates orders
//! - Confirmed orders reserve their components

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use posmrp_core::TenantId;
    use posmrp_inventory::{Company, CompanyId, OperationType, Warehouse, WarehouseId};
    use posmrp_manufacturing::{Bom, BomId, BomType, ProductionStatus};
    use posmrp_products::{ProductId, UnitOfMeasure};
    use posmrp_sales::{SaleId, SaleStatus};
    use posmrp_workflow::messages::render;
    use posmrp_workflow::{
        FinalizationOutcome, Locale, ManufacturingOrderBuilder, ManufacturingOrderService,
        OrderCreationSequencer, PosMrpError, PosMrpSettings, SaleFinalizationHook, SaleRepository,
    };

    use crate::InMemoryBackend;

    /// A tenant with one company, one warehouse and a cake recipe:
    /// 1 cake = 0.5 kg flour + 2 eggs.
    struct Bakery {
        backend: InMemoryBackend,
        settings: PosMrpSettings,
        tenant_id: TenantId,
        company_id: CompanyId,
        warehouse: Warehouse,
        cake: ProductId,
        flour: ProductId,
        eggs: ProductId,
    }

    fn kg() -> UnitOfMeasure {
        UnitOfMeasure::new("kg").unwrap()
    }

    fn bakery() -> Bakery {
        posmrp_observability::init();

        let backend = InMemoryBackend::new();
        let tenant_id = TenantId::new();

        let company = Company::new(CompanyId::generate(), "Acme Bakery").unwrap();
        let company_id = company.id;
        backend.add_company(tenant_id, company).unwrap();
        let warehouse = Warehouse::new(WarehouseId::generate(), company_id, "WH", "Main").unwrap();
        backend.add_warehouse(tenant_id, warehouse.clone()).unwrap();

        let cake = backend
            .create_product(tenant_id, "CAKE", "Chocolate Cake", UnitOfMeasure::units())
            .unwrap()
            .id_typed();
        backend.set_manufacture_on_sale(tenant_id, cake, true).unwrap();
        let flour = backend
            .create_product(tenant_id, "FLR", "Flour", kg())
            .unwrap()
            .id_typed();
        let eggs = backend
            .create_product(tenant_id, "EGG", "Eggs", UnitOfMeasure::units())
            .unwrap()
            .id_typed();

        let recipe = Bom::new(BomId::generate(), cake, BomType::Normal, dec!(1), UnitOfMeasure::units())
            .unwrap()
            .add_line(flour, dec!(0.5), kg())
            .unwrap()
            .add_line(eggs, dec!(2), UnitOfMeasure::units())
            .unwrap();
        backend.add_bom(tenant_id, recipe).unwrap();

        Bakery {
            backend,
            settings: PosMrpSettings::default(),
            tenant_id,
            company_id,
            warehouse,
            cake,
            flour,
            eggs,
        }
    }

    impl Bakery {
        fn stock(&self, product_id: ProductId, qty: Decimal) {
            self.backend
                .adjust_stock(self.tenant_id, product_id, self.warehouse.stock_location_id, qty)
                .unwrap();
        }

        fn sale(&self, lines: &[(ProductId, Decimal)]) -> SaleId {
            let sale = self
                .backend
                .open_sale(self.tenant_id, self.company_id, "Shop/0001")
                .unwrap();
            for (product_id, qty) in lines {
                self.backend
                    .add_line(self.tenant_id, sale.id_typed(), *product_id, *qty, None)
                    .unwrap();
            }
            sale.id_typed()
        }

        fn finalize(&self, sale_id: SaleId) -> Result<FinalizationOutcome, PosMrpError> {
            SaleFinalizationHook::new(self.backend.ports(), &self.settings).process_saved_sale(
                self.tenant_id,
                sale_id,
                false,
            )
        }

        fn order_count(&self, sale_id: SaleId) -> usize {
            self.backend
                .orders_for_sale(self.tenant_id, sale_id)
                .unwrap()
                .len()
        }

        fn sale_status(&self, sale_id: SaleId) -> SaleStatus {
            self.backend
                .load(self.tenant_id, sale_id)
                .unwrap()
                .unwrap()
                .status()
        }
    }

    #[test]
    fn sale_without_flagged_products_creates_no_orders() {
        let b = bakery();
        b.stock(b.flour, dec!(10));
        let sale_id = b.sale(&[(b.flour, dec!(2))]);

        let outcome = b.finalize(sale_id).unwrap();
        assert_eq!(outcome, FinalizationOutcome::Finalized { orders: vec![] });
        assert_eq!(b.sale_status(sale_id), SaleStatus::Paid);
        assert_eq!(b.order_count(sale_id), 0);
    }

    #[test]
    fn refund_lines_are_ignored() {
        let b = bakery();
        let sale_id = b.sale(&[(b.cake, dec!(-2))]);

        let outcome = b.finalize(sale_id).unwrap();
        assert_eq!(outcome, FinalizationOutcome::Finalized { orders: vec![] });
        assert_eq!(b.order_count(sale_id), 0);
    }

    #[test]
    fn stocked_line_gets_one_confirmed_order() {
        let b = bakery();
        b.stock(b.flour, dec!(10));
        b.stock(b.eggs, dec!(12));
        let sale_id = b.sale(&[(b.cake, dec!(3))]);

        let FinalizationOutcome::Finalized { orders } = b.finalize(sale_id).unwrap() else {
            panic!("expected Finalized");
        };
        assert_eq!(orders.len(), 1);

        let stored = b.backend.orders_for_sale(b.tenant_id, sale_id).unwrap();
        assert_eq!(stored.len(), 1);
        let mo = &stored[0];
        assert_eq!(mo.id_typed(), orders[0]);
        assert_eq!(mo.status(), ProductionStatus::Confirmed);

        let values = mo.values().unwrap();
        assert_eq!(values.product_id, b.cake);
        assert_eq!(values.quantity, dec!(3));
        assert_eq!(values.uom, UnitOfMeasure::units());
        assert_eq!(values.sale_id, sale_id);
        assert_eq!(values.company_id, b.company_id);
        assert_eq!(values.warehouse_id, b.warehouse.id);
        assert_eq!(values.origin, "POS: Shop/0001");
        assert_eq!(b.sale_status(sale_id), SaleStatus::Paid);
    }

    #[test]
    fn one_order_per_flagged_line_in_line_order() {
        let b = bakery();
        b.stock(b.flour, dec!(10));
        b.stock(b.eggs, dec!(12));
        let sale_id = b.sale(&[(b.cake, dec!(1)), (b.flour, dec!(1)), (b.cake, dec!(2))]);

        let FinalizationOutcome::Finalized { orders } = b.finalize(sale_id).unwrap() else {
            panic!("expected Finalized");
        };
        let stored = b.backend.orders_for_sale(b.tenant_id, sale_id).unwrap();
        let quantities: Vec<_> = stored.iter().map(|mo| mo.values().unwrap().quantity).collect();
        assert_eq!(quantities, vec![dec!(1), dec!(2)]);
        assert_eq!(orders, stored.iter().map(|mo| mo.id_typed()).collect::<Vec<_>>());
    }

    #[test]
    fn confirmation_reserves_components_at_company_warehouse() {
        let b = bakery();
        b.stock(b.flour, dec!(10));
        b.stock(b.eggs, dec!(12));
        let sale_id = b.sale(&[(b.cake, dec!(4))]);
        b.finalize(sale_id).unwrap();

        let location = b.warehouse.stock_location_id;
        let flour = b.backend.stock_level(b.tenant_id, b.flour, location).unwrap();
        let eggs = b.backend.stock_level(b.tenant_id, b.eggs, location).unwrap();
        assert_eq!(flour.reserved(), dec!(2));
        assert_eq!(flour.on_hand(), dec!(10));
        assert_eq!(eggs.reserved(), dec!(8));
        assert_eq!(eggs.free(), dec!(4));
    }

    #[test]
    fn missing_bom_blocks_the_whole_sale() {
        let b = bakery();
        b.stock(b.flour, dec!(10));
        b.stock(b.eggs, dec!(12));
        let pie = b
            .backend
            .create_product(b.tenant_id, "PIE", "Apple Pie", UnitOfMeasure::units())
            .unwrap()
            .id_typed();
        b.backend.set_manufacture_on_sale(b.tenant_id, pie, true).unwrap();
        let sale_id = b.sale(&[(b.cake, dec!(1)), (pie, dec!(1))]);

        let err = b.finalize(sale_id).unwrap_err();
        assert_eq!(
            err,
            PosMrpError::MissingBom {
                product: "[PIE] Apple Pie".to_string()
            }
        );
        assert!(err.to_string().contains("has no valid Bill of Materials"));
        assert_eq!(b.order_count(sale_id), 0);
        assert_eq!(b.sale_status(sale_id), SaleStatus::Draft);
    }

    #[test]
    fn bom_of_another_company_does_not_count() {
        let b = bakery();
        let tart = b
            .backend
            .create_product(b.tenant_id, "TART", "Tart", UnitOfMeasure::units())
            .unwrap()
            .id_typed();
        b.backend.set_manufacture_on_sale(b.tenant_id, tart, true).unwrap();
        let foreign = Bom::new(BomId::generate(), tart, BomType::Normal, dec!(1), UnitOfMeasure::units())
            .unwrap()
            .with_company(CompanyId::generate());
        b.backend.add_bom(b.tenant_id, foreign).unwrap();
        let sale_id = b.sale(&[(tart, dec!(1))]);

        assert!(matches!(
            b.finalize(sale_id),
            Err(PosMrpError::MissingBom { .. })
        ));
    }

    #[test]
    fn shortage_rolls_back_and_lists_every_short_component() {
        let b = bakery();
        b.stock(b.flour, dec!(4));
        b.stock(b.eggs, dec!(5));
        let sale_id = b.sale(&[(b.cake, dec!(20))]);

        let err = b.finalize(sale_id).unwrap_err();
        let PosMrpError::InsufficientStock { product, shortages } = &err else {
            panic!("expected InsufficientStock, got {err:?}");
        };
        assert_eq!(product, "[CAKE] Chocolate Cake");
        assert_eq!(shortages.len(), 2);
        assert_eq!(shortages[0].product, "[FLR] Flour");
        assert_eq!(shortages[0].required, dec!(10));
        assert_eq!(shortages[0].shortage, dec!(6));

        let text = err.to_string();
        assert!(text.contains("[FLR] Flour"));
        assert!(text.contains("requires 10.00 kg, available 4.00 kg (shortage: 6.00)"));
        assert!(text.contains("[EGG] Eggs"));

        assert_eq!(b.order_count(sale_id), 0);
        assert_eq!(b.sale_status(sale_id), SaleStatus::Draft);
        assert!(!b.backend.in_transaction().unwrap());
        let flour = b
            .backend
            .stock_level(b.tenant_id, b.flour, b.warehouse.stock_location_id)
            .unwrap();
        assert_eq!(flour.reserved(), Decimal::ZERO);
    }

    #[test]
    fn shortage_on_any_line_blocks_every_order() {
        let b = bakery();
        b.stock(b.flour, dec!(1));
        b.stock(b.eggs, dec!(4));
        // Each line fits on its own; stock is checked per line, so this passes.
        let sale_id = b.sale(&[(b.cake, dec!(2)), (b.cake, dec!(2))]);
        assert!(b.finalize(sale_id).is_ok());
        assert_eq!(b.order_count(sale_id), 2);

        let sale_id = b.sale(&[(b.cake, dec!(1)), (b.cake, dec!(5))]);
        assert!(matches!(
            b.finalize(sale_id),
            Err(PosMrpError::InsufficientStock { .. })
        ));
        assert_eq!(b.order_count(sale_id), 0);
    }

    #[test]
    fn batch_bom_with_exactly_enough_stock_finalizes() {
        let b = bakery();
        let loaf = b
            .backend
            .create_product(b.tenant_id, "LOAF", "Loaf", UnitOfMeasure::units())
            .unwrap()
            .id_typed();
        b.backend.set_manufacture_on_sale(b.tenant_id, loaf, true).unwrap();
        // One batch makes 3 loaves from 3 kg of flour.
        let batch = Bom::new(BomId::generate(), loaf, BomType::Normal, dec!(3), UnitOfMeasure::units())
            .unwrap()
            .add_line(b.flour, dec!(3), kg())
            .unwrap();
        b.backend.add_bom(b.tenant_id, batch).unwrap();
        b.stock(b.flour, dec!(2));

        let sale_id = b.sale(&[(loaf, dec!(2))]);
        assert!(matches!(
            b.finalize(sale_id).unwrap(),
            FinalizationOutcome::Finalized { .. }
        ));
        assert_eq!(b.order_count(sale_id), 1);

        let flour = b
            .backend
            .stock_level(b.tenant_id, b.flour, b.warehouse.stock_location_id)
            .unwrap();
        assert_eq!(flour.reserved(), dec!(2));
        assert_eq!(flour.free(), Decimal::ZERO);
    }

    #[test]
    fn arabic_locale_renders_shortage() {
        let b = bakery();
        let sale_id = b.sale(&[(b.cake, dec!(1))]);

        let err = b.finalize(sale_id).unwrap_err();
        let text = render(&err, Locale::Ar);
        assert!(text.contains("[CAKE] Chocolate Cake"));
        assert!(text.contains("0.50"));
    }

    #[test]
    fn finalizing_twice_never_duplicates_orders() {
        let b = bakery();
        b.stock(b.flour, dec!(10));
        b.stock(b.eggs, dec!(12));
        let sale_id = b.sale(&[(b.cake, dec!(1))]);

        assert!(matches!(
            b.finalize(sale_id).unwrap(),
            FinalizationOutcome::Finalized { .. }
        ));
        assert_eq!(b.finalize(sale_id).unwrap(), FinalizationOutcome::AlreadyFinalized);
        assert_eq!(b.order_count(sale_id), 1);
    }

    #[test]
    fn draft_save_and_cancelled_sale_do_nothing() {
        let b = bakery();
        b.stock(b.flour, dec!(10));
        b.stock(b.eggs, dec!(12));
        let sale_id = b.sale(&[(b.cake, dec!(1))]);

        let hook = SaleFinalizationHook::new(b.backend.ports(), &b.settings);
        assert_eq!(
            hook.process_saved_sale(b.tenant_id, sale_id, true).unwrap(),
            FinalizationOutcome::SavedAsDraft
        );
        assert_eq!(b.sale_status(sale_id), SaleStatus::Draft);

        b.backend.cancel_sale(b.tenant_id, sale_id).unwrap();
        assert_eq!(b.finalize(sale_id).unwrap(), FinalizationOutcome::Cancelled);
        assert_eq!(b.order_count(sale_id), 0);
    }

    #[test]
    fn unknown_sale_is_reported() {
        let b = bakery();
        assert!(matches!(
            b.finalize(SaleId::generate()),
            Err(PosMrpError::Port(posmrp_workflow::PortError::NotFound(_)))
        ));
    }

    #[test]
    fn company_without_warehouse_is_rejected() {
        let b = bakery();
        let bare = Company::new(CompanyId::generate(), "Pop-up Stand").unwrap();
        let bare_id = bare.id;
        b.backend.add_company(b.tenant_id, bare).unwrap();

        let sale = b.backend.open_sale(b.tenant_id, bare_id, "Stand/0001").unwrap();
        b.backend
            .add_line(b.tenant_id, sale.id_typed(), b.cake, dec!(1), None)
            .unwrap();

        let err = b.finalize(sale.id_typed()).unwrap_err();
        assert_eq!(
            err,
            PosMrpError::MissingWarehouse {
                company: "Pop-up Stand".to_string()
            }
        );
        assert_eq!(b.sale_status(sale.id_typed()), SaleStatus::Draft);
    }

    #[test]
    fn operation_type_is_set_only_when_configured() {
        let b = bakery();
        b.stock(b.flour, dec!(10));
        b.stock(b.eggs, dec!(12));

        let first = b.sale(&[(b.cake, dec!(1))]);
        b.finalize(first).unwrap();
        let mo = b.backend.orders_for_sale(b.tenant_id, first).unwrap().remove(0);
        assert_eq!(mo.values().unwrap().operation_type_id, None);

        let op = OperationType::manufacturing(b.warehouse.id);
        let op_id = op.id;
        b.backend.add_operation_type(b.tenant_id, op).unwrap();

        let second = b.sale(&[(b.cake, dec!(1))]);
        b.finalize(second).unwrap();
        let mo = b.backend.orders_for_sale(b.tenant_id, second).unwrap().remove(0);
        assert_eq!(mo.values().unwrap().operation_type_id, Some(op_id));
    }

    #[test]
    fn default_warehouse_supplies_components() {
        let b = bakery();
        let outlet = Warehouse::new(WarehouseId::generate(), b.company_id, "AAA", "Outlet")
            .unwrap()
            .with_sequence(1);
        b.backend.add_warehouse(b.tenant_id, outlet.clone()).unwrap();

        // Lowest sequence wins until a default is designated.
        b.stock(b.flour, dec!(10));
        b.stock(b.eggs, dec!(12));
        let sale_id = b.sale(&[(b.cake, dec!(1))]);
        assert!(matches!(
            b.finalize(sale_id),
            Err(PosMrpError::InsufficientStock { .. })
        ));

        b.backend
            .set_default_warehouse(b.tenant_id, b.company_id, b.warehouse.id)
            .unwrap();
        assert!(b.finalize(sale_id).is_ok());
        assert_eq!(b.order_count(sale_id), 1);
    }

    #[test]
    fn standalone_sequencer_skips_lines_without_bom() {
        let b = bakery();
        let pie = b
            .backend
            .create_product(b.tenant_id, "PIE", "Apple Pie", UnitOfMeasure::units())
            .unwrap()
            .id_typed();
        b.backend.set_manufacture_on_sale(b.tenant_id, pie, true).unwrap();
        let sale_id = b.sale(&[(pie, dec!(1)), (b.cake, dec!(2))]);
        let sale = b.backend.load(b.tenant_id, sale_id).unwrap().unwrap();

        let builder = ManufacturingOrderBuilder::new(&b.backend, &b.settings);
        let sequencer = OrderCreationSequencer::new(&b.backend, &b.backend, &b.backend, builder);
        let created = sequencer
            .create_manufacturing_orders(b.tenant_id, std::slice::from_ref(&sale))
            .unwrap();

        assert_eq!(created.len(), 1);
        assert_eq!(created[0].values().unwrap().product_id, b.cake);
        assert_eq!(created[0].status(), ProductionStatus::Confirmed);
    }

    #[test]
    fn tenants_do_not_see_each_other() {
        let b = bakery();
        b.stock(b.flour, dec!(10));
        b.stock(b.eggs, dec!(12));
        let sale_id = b.sale(&[(b.cake, dec!(1))]);
        b.finalize(sale_id).unwrap();

        let other = TenantId::new();
        assert!(b.backend.orders_for_sale(other, sale_id).unwrap().is_empty());
        assert!(b.backend.load(other, sale_id).unwrap().is_none());
    }
}
