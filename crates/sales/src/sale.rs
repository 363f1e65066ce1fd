use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use posmrp_core::{Aggregate, AggregateRoot, DomainError, TenantId};
use posmrp_events::Event;
use posmrp_inventory::CompanyId;
use posmrp_products::{Product, ProductId, UnitOfMeasure};

posmrp_core::domain_id!(
    /// Sale identifier (tenant-scoped via `tenant_id` fields in events/commands).
    SaleId
);

/// Sale status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Draft,
    Paid,
    Done,
    Cancelled,
}

/// Sale line: product and signed quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    pub line_no: u32,
    pub product_id: ProductId,
    /// Positive for a sale, negative for a refund.
    pub quantity: Decimal,
    /// Falls back to the product's unit when unset.
    pub uom: Option<UnitOfMeasure>,
}

impl SaleLine {
    pub fn is_refund(&self) -> bool {
        self.quantity < Decimal::ZERO
    }

    /// True when selling this line must produce a manufacturing order: the
    /// product is flagged and the quantity is strictly positive.
    pub fn is_manufacturable(&self, product: &Product) -> bool {
        product.id_typed() == self.product_id
            && product.manufacture_on_sale()
            && self.quantity > Decimal::ZERO
    }
}

/// Aggregate root: Sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sale {
    id: SaleId,
    tenant_id: Option<TenantId>,
    company_id: Option<CompanyId>,
    name: String,
    status: SaleStatus,
    lines: Vec<SaleLine>,
    version: u64,
    created: bool,
}

impl Sale {
    /// Create an empty, not-yet-created aggregate instance for rehydration.
    pub fn empty(id: SaleId) -> Self {
        Self {
            id,
            tenant_id: None,
            company_id: None,
            name: String::new(),
            status: SaleStatus::Draft,
            lines: Vec::new(),
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> SaleId {
        self.id
    }

    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    pub fn company_id(&self) -> Option<CompanyId> {
        self.company_id
    }

    /// Display name, e.g. "Shop/0001".
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> SaleStatus {
        self.status
    }

    pub fn lines(&self) -> &[SaleLine] {
        &self.lines
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    pub fn is_draft(&self) -> bool {
        matches!(self.status, SaleStatus::Draft)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.status, SaleStatus::Cancelled)
    }

    /// Paid or done.
    pub fn is_finalized(&self) -> bool {
        matches!(self.status, SaleStatus::Paid | SaleStatus::Done)
    }
}

impl AggregateRoot for Sale {
    type Id = SaleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateSale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSale {
    pub tenant_id: TenantId,
    pub sale_id: SaleId,
    pub company_id: CompanyId,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddLine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLine {
    pub tenant_id: TenantId,
    pub sale_id: SaleId,
    pub product_id: ProductId,
    pub quantity: Decimal,
    pub uom: Option<UnitOfMeasure>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: FinalizeSale (payment received).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizeSale {
    pub tenant_id: TenantId,
    pub sale_id: SaleId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CancelSale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelSale {
    pub tenant_id: TenantId,
    pub sale_id: SaleId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CloseSale (session closing posts paid sales).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseSale {
    pub tenant_id: TenantId,
    pub sale_id: SaleId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleCommand {
    CreateSale(CreateSale),
    AddLine(AddLine),
    FinalizeSale(FinalizeSale),
    CancelSale(CancelSale),
    CloseSale(CloseSale),
}

/// Event: SaleCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleCreated {
    pub tenant_id: TenantId,
    pub sale_id: SaleId,
    pub company_id: CompanyId,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: LineAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAdded {
    pub tenant_id: TenantId,
    pub sale_id: SaleId,
    pub line_no: u32,
    pub product_id: ProductId,
    pub quantity: Decimal,
    pub uom: Option<UnitOfMeasure>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: SaleFinalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleFinalized {
    pub tenant_id: TenantId,
    pub sale_id: SaleId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: SaleCancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleCancelled {
    pub tenant_id: TenantId,
    pub sale_id: SaleId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: SaleClosed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleClosed {
    pub tenant_id: TenantId,
    pub sale_id: SaleId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleEvent {
    SaleCreated(SaleCreated),
    LineAdded(LineAdded),
    SaleFinalized(SaleFinalized),
    SaleCancelled(SaleCancelled),
    SaleClosed(SaleClosed),
}

impl Event for SaleEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SaleEvent::SaleCreated(_) => "sales.sale.created",
            SaleEvent::LineAdded(_) => "sales.sale.line_added",
            SaleEvent::SaleFinalized(_) => "sales.sale.finalized",
            SaleEvent::SaleCancelled(_) => "sales.sale.cancelled",
            SaleEvent::SaleClosed(_) => "sales.sale.closed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SaleEvent::SaleCreated(e) => e.occurred_at,
            SaleEvent::LineAdded(e) => e.occurred_at,
            SaleEvent::SaleFinalized(e) => e.occurred_at,
            SaleEvent::SaleCancelled(e) => e.occurred_at,
            SaleEvent::SaleClosed(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Sale {
    type Command = SaleCommand;
    type Event = SaleEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            SaleEvent::SaleCreated(e) => {
                self.id = e.sale_id;
                self.tenant_id = Some(e.tenant_id);
                self.company_id = Some(e.company_id);
                self.name = e.name.clone();
                self.status = SaleStatus::Draft;
                self.lines.clear();
                self.created = true;
            }
            SaleEvent::LineAdded(e) => {
                self.lines.push(SaleLine {
                    line_no: e.line_no,
                    product_id: e.product_id,
                    quantity: e.quantity,
                    uom: e.uom.clone(),
                });
            }
            SaleEvent::SaleFinalized(_) => {
                self.status = SaleStatus::Paid;
            }
            SaleEvent::SaleCancelled(_) => {
                self.status = SaleStatus::Cancelled;
            }
            SaleEvent::SaleClosed(_) => {
                self.status = SaleStatus::Done;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            SaleCommand::CreateSale(cmd) => self.handle_create(cmd),
            SaleCommand::AddLine(cmd) => self.handle_add_line(cmd),
            SaleCommand::FinalizeSale(cmd) => self.handle_finalize(cmd),
            SaleCommand::CancelSale(cmd) => self.handle_cancel(cmd),
            SaleCommand::CloseSale(cmd) => self.handle_close(cmd),
        }
    }
}

impl Sale {
    fn ensure_tenant(&self, tenant_id: TenantId) -> Result<(), DomainError> {
        if !self.created {
            return Ok(());
        }
        if self.tenant_id != Some(tenant_id) {
            return Err(DomainError::invariant("tenant mismatch"));
        }
        Ok(())
    }

    fn ensure_sale_id(&self, sale_id: SaleId) -> Result<(), DomainError> {
        if self.id != sale_id {
            return Err(DomainError::invariant("sale_id mismatch"));
        }
        Ok(())
    }

    fn ensure_existing(&self, tenant_id: TenantId, sale_id: SaleId) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_tenant(tenant_id)?;
        self.ensure_sale_id(sale_id)
    }

    fn handle_create(&self, cmd: &CreateSale) -> Result<Vec<SaleEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("sale already exists"));
        }
        if cmd.name.trim().is_empty() {
            return Err(DomainError::validation("sale name cannot be empty"));
        }

        Ok(vec![SaleEvent::SaleCreated(SaleCreated {
            tenant_id: cmd.tenant_id,
            sale_id: cmd.sale_id,
            company_id: cmd.company_id,
            name: cmd.name.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_add_line(&self, cmd: &AddLine) -> Result<Vec<SaleEvent>, DomainError> {
        self.ensure_existing(cmd.tenant_id, cmd.sale_id)?;

        if !self.is_draft() {
            return Err(DomainError::invariant(
                "cannot modify a sale once it is finalized or cancelled",
            ));
        }

        if cmd.quantity.is_zero() {
            return Err(DomainError::validation("quantity cannot be zero"));
        }

        let next_line_no = (self.lines.len() as u32) + 1;

        Ok(vec![SaleEvent::LineAdded(LineAdded {
            tenant_id: cmd.tenant_id,
            sale_id: cmd.sale_id,
            line_no: next_line_no,
            product_id: cmd.product_id,
            quantity: cmd.quantity,
            uom: cmd.uom.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_finalize(&self, cmd: &FinalizeSale) -> Result<Vec<SaleEvent>, DomainError> {
        self.ensure_existing(cmd.tenant_id, cmd.sale_id)?;

        match self.status {
            SaleStatus::Draft => {}
            SaleStatus::Cancelled => {
                return Err(DomainError::invariant("a cancelled sale cannot be finalized"));
            }
            SaleStatus::Paid | SaleStatus::Done => {
                return Err(DomainError::conflict("sale is already finalized"));
            }
        }

        if self.lines.is_empty() {
            return Err(DomainError::validation("cannot finalize a sale without lines"));
        }

        Ok(vec![SaleEvent::SaleFinalized(SaleFinalized {
            tenant_id: cmd.tenant_id,
            sale_id: cmd.sale_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_cancel(&self, cmd: &CancelSale) -> Result<Vec<SaleEvent>, DomainError> {
        self.ensure_existing(cmd.tenant_id, cmd.sale_id)?;

        if !self.is_draft() {
            return Err(DomainError::invariant("only draft sales can be cancelled"));
        }

        Ok(vec![SaleEvent::SaleCancelled(SaleCancelled {
            tenant_id: cmd.tenant_id,
            sale_id: cmd.sale_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_close(&self, cmd: &CloseSale) -> Result<Vec<SaleEvent>, DomainError> {
        self.ensure_existing(cmd.tenant_id, cmd.sale_id)?;

        if self.status != SaleStatus::Paid {
            return Err(DomainError::invariant("only paid sales can be closed"));
        }

        Ok(vec![SaleEvent::SaleClosed(SaleClosed {
            tenant_id: cmd.tenant_id,
            sale_id: cmd.sale_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posmrp_products::{CreateProduct, ProductCommand, SetManufactureOnSale};
    use rust_decimal_macros::dec;

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn run(sale: &mut Sale, cmd: SaleCommand) -> Result<Vec<SaleEvent>, DomainError> {
        let events = sale.handle(&cmd)?;
        for ev in &events {
            sale.apply(ev);
        }
        Ok(events)
    }

    fn draft_sale(tenant_id: TenantId) -> Sale {
        let sale_id = SaleId::generate();
        let mut sale = Sale::empty(sale_id);
        run(
            &mut sale,
            SaleCommand::CreateSale(CreateSale {
                tenant_id,
                sale_id,
                company_id: CompanyId::generate(),
                name: "Shop/0001".to_string(),
                occurred_at: test_time(),
            }),
        )
        .unwrap();
        sale
    }

    fn add_line(sale: &mut Sale, tenant_id: TenantId, quantity: Decimal) -> Result<(), DomainError> {
        let sale_id = sale.id_typed();
        run(
            sale,
            SaleCommand::AddLine(AddLine {
                tenant_id,
                sale_id,
                product_id: ProductId::generate(),
                quantity,
                uom: None,
                occurred_at: test_time(),
            }),
        )
        .map(|_| ())
    }

    fn finalize(sale: &mut Sale, tenant_id: TenantId) -> Result<Vec<SaleEvent>, DomainError> {
        let sale_id = sale.id_typed();
        run(
            sale,
            SaleCommand::FinalizeSale(FinalizeSale {
                tenant_id,
                sale_id,
                occurred_at: test_time(),
            }),
        )
    }

    #[test]
    fn lines_keep_their_order_and_sign() {
        let tenant_id = TenantId::new();
        let mut sale = draft_sale(tenant_id);
        add_line(&mut sale, tenant_id, dec!(2)).unwrap();
        add_line(&mut sale, tenant_id, dec!(-1)).unwrap();

        let lines = sale.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line_no, 1);
        assert!(!lines[0].is_refund());
        assert_eq!(lines[1].line_no, 2);
        assert!(lines[1].is_refund());
    }

    #[test]
    fn zero_quantity_line_is_rejected() {
        let tenant_id = TenantId::new();
        let mut sale = draft_sale(tenant_id);
        let err = add_line(&mut sale, tenant_id, dec!(0)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn finalize_moves_draft_to_paid() {
        let tenant_id = TenantId::new();
        let mut sale = draft_sale(tenant_id);
        add_line(&mut sale, tenant_id, dec!(1)).unwrap();

        let events = finalize(&mut sale, tenant_id).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "sales.sale.finalized");
        assert_eq!(sale.status(), SaleStatus::Paid);
        assert!(sale.is_finalized());
    }

    #[test]
    fn finalize_twice_is_a_conflict() {
        let tenant_id = TenantId::new();
        let mut sale = draft_sale(tenant_id);
        add_line(&mut sale, tenant_id, dec!(1)).unwrap();
        finalize(&mut sale, tenant_id).unwrap();

        let version = sale.version();
        let err = finalize(&mut sale, tenant_id).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(sale.version(), version);
    }

    #[test]
    fn finalize_requires_lines() {
        let tenant_id = TenantId::new();
        let mut sale = draft_sale(tenant_id);
        let err = finalize(&mut sale, tenant_id).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn cancelled_sale_cannot_be_finalized_or_modified() {
        let tenant_id = TenantId::new();
        let mut sale = draft_sale(tenant_id);
        add_line(&mut sale, tenant_id, dec!(1)).unwrap();
        let sale_id = sale.id_typed();
        run(
            &mut sale,
            SaleCommand::CancelSale(CancelSale {
                tenant_id,
                sale_id,
                occurred_at: test_time(),
            }),
        )
        .unwrap();

        assert!(sale.is_cancelled());
        assert!(matches!(
            finalize(&mut sale, tenant_id).unwrap_err(),
            DomainError::InvariantViolation(_)
        ));
        assert!(add_line(&mut sale, tenant_id, dec!(1)).is_err());
    }

    #[test]
    fn close_requires_paid() {
        let tenant_id = TenantId::new();
        let mut sale = draft_sale(tenant_id);
        add_line(&mut sale, tenant_id, dec!(1)).unwrap();
        let sale_id = sale.id_typed();
        let close = SaleCommand::CloseSale(CloseSale {
            tenant_id,
            sale_id,
            occurred_at: test_time(),
        });

        assert!(run(&mut sale, close.clone()).is_err());
        finalize(&mut sale, tenant_id).unwrap();
        run(&mut sale, close).unwrap();
        assert_eq!(sale.status(), SaleStatus::Done);
        assert!(sale.is_finalized());
    }

    #[test]
    fn manufacturable_requires_flag_and_positive_quantity() {
        let tenant_id = TenantId::new();
        let product_id = ProductId::generate();
        let mut product = Product::empty(product_id);
        for cmd in [
            ProductCommand::CreateProduct(CreateProduct {
                tenant_id,
                product_id,
                sku: String::new(),
                name: "Cake".to_string(),
                uom: UnitOfMeasure::units(),
                occurred_at: test_time(),
            }),
            ProductCommand::SetManufactureOnSale(SetManufactureOnSale {
                tenant_id,
                product_id,
                enabled: true,
                occurred_at: test_time(),
            }),
        ] {
            for ev in product.handle(&cmd).unwrap() {
                product.apply(&ev);
            }
        }

        let line = |quantity| SaleLine {
            line_no: 1,
            product_id,
            quantity,
            uom: None,
        };

        assert!(line(dec!(1)).is_manufacturable(&product));
        assert!(!line(dec!(-1)).is_manufacturable(&product));

        let other = SaleLine {
            product_id: ProductId::generate(),
            ..line(dec!(1))
        };
        assert!(!other.is_manufacturable(&product));
    }

    #[test]
    fn other_tenant_cannot_add_lines() {
        let mut sale = draft_sale(TenantId::new());
        let err = add_line(&mut sale, TenantId::new(), dec!(1)).unwrap_err();
        match err {
            DomainError::InvariantViolation(msg) if msg.contains("tenant mismatch") => {}
            _ => panic!("Expected tenant mismatch"),
        }
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: line numbers follow insertion order and the version
            /// counts every accepted command.
            #[test]
            fn lines_are_numbered_in_order(qtys in proptest::collection::vec(-20i64..20, 1..15)) {
                let tenant_id = TenantId::new();
                let mut sale = draft_sale(tenant_id);
                let mut accepted = 0u64;
                for q in qtys {
                    if add_line(&mut sale, tenant_id, Decimal::from(q)).is_ok() {
                        accepted += 1;
                    }
                }

                prop_assert_eq!(sale.lines().len() as u64, accepted);
                prop_assert_eq!(sale.version(), 1 + accepted);
                for (i, line) in sale.lines().iter().enumerate() {
                    prop_assert_eq!(line.line_no as usize, i + 1);
                    prop_assert!(!line.quantity.is_zero());
                }
            }
        }
    }
}
