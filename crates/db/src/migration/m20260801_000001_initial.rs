//! Initial database migration.
//!
//! Creates all enums, tables, cascade foreign keys, indexes, and the seed
//! denomination set.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: TENANCY & IDENTITY
        // ============================================================
        db.execute_unprepared(AREAS_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(EMPLOYEES_SQL).await?;

        // ============================================================
        // PART 3: PRODUCT CATALOG & PRICE HISTORY
        // ============================================================
        db.execute_unprepared(PRODUCTS_SQL).await?;
        db.execute_unprepared(PRICE_HISTORY_SQL).await?;

        // ============================================================
        // PART 4: CASH LEDGER
        // ============================================================
        db.execute_unprepared(DENOMINATIONS_SQL).await?;
        db.execute_unprepared(CASH_ACCOUNTS_SQL).await?;
        db.execute_unprepared(CASH_TRANSACTIONS_SQL).await?;
        db.execute_unprepared(CASH_TRANSACTION_LINES_SQL).await?;
        db.execute_unprepared(CASH_ADJUSTMENTS_SQL).await?;
        db.execute_unprepared(CASH_ADJUSTMENT_LINES_SQL).await?;

        // ============================================================
        // PART 5: DOCUMENTS (SALES, PURCHASES, ORDERS)
        // ============================================================
        db.execute_unprepared(SALES_SQL).await?;
        db.execute_unprepared(SALE_LINES_SQL).await?;
        db.execute_unprepared(PURCHASE_REQUESTS_SQL).await?;
        db.execute_unprepared(PURCHASE_REQUEST_LINES_SQL).await?;
        db.execute_unprepared(ORDERS_SQL).await?;
        db.execute_unprepared(ORDER_LINES_SQL).await?;

        // ============================================================
        // PART 6: INVOICES
        // ============================================================
        db.execute_unprepared(INVOICES_SQL).await?;
        db.execute_unprepared(INVOICE_LINES_SQL).await?;

        // ============================================================
        // PART 7: STOCK LEDGER
        // ============================================================
        db.execute_unprepared(STOCK_MOVEMENTS_SQL).await?;

        // ============================================================
        // PART 8: INDEXES
        // ============================================================
        db.execute_unprepared(INDEXES_SQL).await?;

        // ============================================================
        // PART 9: SEED DATA
        // ============================================================
        db.execute_unprepared(SEED_DENOMINATIONS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Stock ledger
CREATE TYPE movement_direction AS ENUM ('in', 'out');

CREATE TYPE movement_operation AS ENUM (
    'sale',
    'supply',
    'correction',
    'return_supplier',
    'return_customer',
    'other'
);

CREATE TYPE product_state AS ENUM ('pending', 'validated', 'rejected');

CREATE TYPE price_type AS ENUM ('sale', 'purchase');

-- Cash ledger
CREATE TYPE transaction_direction AS ENUM ('in', 'out');

CREATE TYPE cash_operation AS ENUM (
    'sale_payment',
    'supply',
    'correction_in',
    'correction_out',
    'bank_transfer',
    'misc_expense_in',
    'misc_expense_out'
);

CREATE TYPE cash_account_state AS ENUM (
    'open',
    'closed',
    'balanced',
    'not_balanced',
    'balanced_forced'
);

CREATE TYPE adjustment_kind AS ENUM ('opening', 'balancing', 'forcing_balance');

-- Settlement (cash transactions and invoices)
CREATE TYPE settlement_status AS ENUM (
    'pending',
    'opened',
    'finalized',
    'completed',
    'partial',
    'closed',
    'canceled',
    'rejected',
    'failed'
);

-- Documents
CREATE TYPE invoice_type AS ENUM ('in', 'out');

CREATE TYPE document_status AS ENUM ('opened', 'delivered', 'closed', 'rejected');

CREATE TYPE sale_status AS ENUM ('pending', 'delivered', 'rejected');
";

const AREAS_SQL: &str = r"
CREATE TABLE areas (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    location VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    display_name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const EMPLOYEES_SQL: &str = r"
CREATE TABLE employees (
    id UUID PRIMARY KEY,
    area_id UUID NOT NULL REFERENCES areas(id) ON DELETE CASCADE,
    display_name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const PRODUCTS_SQL: &str = r"
CREATE TABLE products (
    id UUID PRIMARY KEY,
    area_id UUID NOT NULL REFERENCES areas(id) ON DELETE CASCADE,
    reference VARCHAR(50) NOT NULL,
    name VARCHAR(255) NOT NULL,
    purchase_price NUMERIC(18, 2) NOT NULL,
    sale_price NUMERIC(18, 2) NOT NULL,
    old_stock NUMERIC(18, 2) NOT NULL DEFAULT 0,
    actual_stock NUMERIC(18, 2) NOT NULL DEFAULT 0,
    state product_state NOT NULL DEFAULT 'pending',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (area_id, reference)
);
";

const PRICE_HISTORY_SQL: &str = r"
CREATE TABLE price_history (
    id UUID PRIMARY KEY,
    product_id UUID NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    price_type price_type NOT NULL,
    old_value NUMERIC(18, 2) NOT NULL,
    new_value NUMERIC(18, 2) NOT NULL,
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const DENOMINATIONS_SQL: &str = r"
CREATE TABLE denominations (
    id UUID PRIMARY KEY,
    name VARCHAR(10) NOT NULL UNIQUE,
    value NUMERIC(18, 2) NOT NULL,
    currency VARCHAR(10) NOT NULL
);
";

const CASH_ACCOUNTS_SQL: &str = r"
CREATE TABLE cash_accounts (
    id UUID PRIMARY KEY,
    area_id UUID NOT NULL REFERENCES areas(id) ON DELETE CASCADE,
    user_id UUID NOT NULL REFERENCES users(id),
    amount_init NUMERIC(18, 2) NOT NULL DEFAULT 0,
    balancing_amount NUMERIC(18, 2) NOT NULL DEFAULT 0,
    state cash_account_state NOT NULL DEFAULT 'open',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const CASH_TRANSACTIONS_SQL: &str = r"
CREATE TABLE cash_transactions (
    id UUID PRIMARY KEY,
    register_id UUID NOT NULL REFERENCES cash_accounts(id) ON DELETE CASCADE,
    direction transaction_direction NOT NULL,
    operation cash_operation NOT NULL,
    status settlement_status NOT NULL DEFAULT 'pending',
    date_of DATE NOT NULL,
    payment_ref VARCHAR(255),
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_reason VARCHAR(255),
    updated_at TIMESTAMPTZ,
    updated_by UUID REFERENCES users(id)
);
";

const CASH_TRANSACTION_LINES_SQL: &str = r"
CREATE TABLE cash_transaction_lines (
    id UUID PRIMARY KEY,
    transaction_id UUID NOT NULL REFERENCES cash_transactions(id) ON DELETE CASCADE,
    denomination_id UUID NOT NULL REFERENCES denominations(id),
    quantity INTEGER NOT NULL CHECK (quantity > 0)
);
";

const CASH_ADJUSTMENTS_SQL: &str = r"
CREATE TABLE cash_adjustments (
    id UUID PRIMARY KEY,
    register_id UUID NOT NULL REFERENCES cash_accounts(id) ON DELETE CASCADE,
    kind adjustment_kind NOT NULL,
    performed_by UUID NOT NULL REFERENCES users(id),
    date_of DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const CASH_ADJUSTMENT_LINES_SQL: &str = r"
CREATE TABLE cash_adjustment_lines (
    id UUID PRIMARY KEY,
    adjustment_id UUID NOT NULL REFERENCES cash_adjustments(id) ON DELETE CASCADE,
    denomination_id UUID NOT NULL REFERENCES denominations(id),
    quantity INTEGER NOT NULL CHECK (quantity > 0)
);
";

const SALES_SQL: &str = r"
CREATE TABLE sales (
    id UUID PRIMARY KEY,
    area_id UUID NOT NULL REFERENCES areas(id) ON DELETE CASCADE,
    reference VARCHAR(255) NOT NULL UNIQUE,
    status sale_status NOT NULL DEFAULT 'pending',
    date_of DATE NOT NULL,
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ,
    updated_by UUID REFERENCES users(id)
);
";

const SALE_LINES_SQL: &str = r"
CREATE TABLE sale_lines (
    id UUID PRIMARY KEY,
    sale_id UUID NOT NULL REFERENCES sales(id) ON DELETE CASCADE,
    product_id UUID NOT NULL REFERENCES products(id),
    quantity NUMERIC(18, 2) NOT NULL CHECK (quantity > 0),
    unit_price NUMERIC(18, 2) NOT NULL,
    delivered_at TIMESTAMPTZ
);
";

const PURCHASE_REQUESTS_SQL: &str = r"
CREATE TABLE purchase_requests (
    id UUID PRIMARY KEY,
    area_id UUID NOT NULL REFERENCES areas(id) ON DELETE CASCADE,
    reference VARCHAR(255) NOT NULL UNIQUE,
    status document_status NOT NULL DEFAULT 'opened',
    date_of DATE NOT NULL,
    comments VARCHAR(255),
    initiated_by UUID NOT NULL REFERENCES employees(id),
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ,
    updated_by UUID REFERENCES users(id)
);
";

const PURCHASE_REQUEST_LINES_SQL: &str = r"
CREATE TABLE purchase_request_lines (
    id UUID PRIMARY KEY,
    purchase_id UUID NOT NULL REFERENCES purchase_requests(id) ON DELETE CASCADE,
    product_id UUID NOT NULL REFERENCES products(id),
    quantity_requested NUMERIC(18, 2) NOT NULL CHECK (quantity_requested > 0),
    quantity_accorded NUMERIC(18, 2),
    unit_price NUMERIC(18, 2) NOT NULL
);
";

const ORDERS_SQL: &str = r"
CREATE TABLE orders (
    id UUID PRIMARY KEY,
    area_id UUID NOT NULL REFERENCES areas(id) ON DELETE CASCADE,
    reference VARCHAR(255) NOT NULL UNIQUE,
    status document_status NOT NULL DEFAULT 'opened',
    date_of DATE NOT NULL,
    comments VARCHAR(255),
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ,
    updated_by UUID REFERENCES users(id)
);
";

const ORDER_LINES_SQL: &str = r"
CREATE TABLE order_lines (
    id UUID PRIMARY KEY,
    order_id UUID NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
    product_id UUID NOT NULL REFERENCES products(id),
    quantity_requested NUMERIC(18, 2) NOT NULL CHECK (quantity_requested > 0),
    quantity_accorded NUMERIC(18, 2),
    unit_price NUMERIC(18, 2) NOT NULL
);
";

const INVOICES_SQL: &str = r"
CREATE TABLE invoices (
    id UUID PRIMARY KEY,
    area_id UUID NOT NULL REFERENCES areas(id) ON DELETE CASCADE,
    reference VARCHAR(50),
    invoice_type invoice_type NOT NULL,
    status settlement_status NOT NULL DEFAULT 'pending',
    amount_payed NUMERIC(18, 2) NOT NULL DEFAULT 0 CHECK (amount_payed >= 0),
    date_of DATE NOT NULL,
    comments VARCHAR(255),
    purchase_id UUID REFERENCES purchase_requests(id),
    order_id UUID REFERENCES orders(id),
    initiated_by UUID NOT NULL REFERENCES employees(id),
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ,
    updated_by UUID REFERENCES users(id),
    -- An invoice comes from a purchase request or an order, never both
    CHECK (purchase_id IS NULL OR order_id IS NULL)
);
";

const INVOICE_LINES_SQL: &str = r"
CREATE TABLE invoice_lines (
    id UUID PRIMARY KEY,
    invoice_id UUID NOT NULL REFERENCES invoices(id) ON DELETE CASCADE,
    product_id UUID NOT NULL REFERENCES products(id),
    quantity_requested NUMERIC(18, 2) NOT NULL CHECK (quantity_requested > 0),
    quantity_real NUMERIC(18, 2),
    unit_price NUMERIC(18, 2) NOT NULL
);
";

const STOCK_MOVEMENTS_SQL: &str = r"
CREATE TABLE stock_movements (
    id UUID PRIMARY KEY,
    area_id UUID NOT NULL REFERENCES areas(id) ON DELETE CASCADE,
    product_id UUID NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    direction movement_direction NOT NULL,
    operation movement_operation NOT NULL,
    quantity NUMERIC(18, 2) NOT NULL CHECK (quantity > 0),
    date_of DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    comment VARCHAR(255),
    initiated_by UUID NOT NULL REFERENCES employees(id),
    created_by UUID NOT NULL REFERENCES users(id),
    -- Reversing entries point at the movement they undo; one reversal max
    reverses_id UUID UNIQUE REFERENCES stock_movements(id),
    -- Delivery idempotency: one movement per document detail line
    sale_line_id UUID UNIQUE REFERENCES sale_lines(id),
    purchase_line_id UUID UNIQUE REFERENCES purchase_request_lines(id),
    order_line_id UUID UNIQUE REFERENCES order_lines(id),
    -- At most one back-reference
    CHECK (
        (sale_line_id IS NOT NULL)::int
        + (purchase_line_id IS NOT NULL)::int
        + (order_line_id IS NOT NULL)::int <= 1
    )
);
";

const INDEXES_SQL: &str = r"
-- History reads: newest movements first for one product in one area
CREATE INDEX idx_stock_movements_product_created
    ON stock_movements (product_id, created_at DESC);
CREATE INDEX idx_stock_movements_area_date
    ON stock_movements (area_id, date_of);

-- Theoretical balance: one register, one business date
CREATE INDEX idx_cash_transactions_register_date
    ON cash_transactions (register_id, date_of);

CREATE INDEX idx_cash_transaction_lines_transaction
    ON cash_transaction_lines (transaction_id);
CREATE INDEX idx_cash_adjustment_lines_adjustment
    ON cash_adjustment_lines (adjustment_id);

CREATE INDEX idx_invoices_purchase ON invoices (purchase_id);
CREATE INDEX idx_invoices_order ON invoices (order_id);
CREATE INDEX idx_invoice_lines_invoice ON invoice_lines (invoice_id);

CREATE INDEX idx_products_area_state ON products (area_id, state);
";

const SEED_DENOMINATIONS_SQL: &str = r"
-- Ariary note and coin set
INSERT INTO denominations (id, name, value, currency) VALUES
    (gen_random_uuid(), '20000', 20000, 'MGA'),
    (gen_random_uuid(), '10000', 10000, 'MGA'),
    (gen_random_uuid(), '5000', 5000, 'MGA'),
    (gen_random_uuid(), '2000', 2000, 'MGA'),
    (gen_random_uuid(), '1000', 1000, 'MGA'),
    (gen_random_uuid(), '500', 500, 'MGA'),
    (gen_random_uuid(), '200', 200, 'MGA'),
    (gen_random_uuid(), '100', 100, 'MGA'),
    (gen_random_uuid(), '50', 50, 'MGA')
ON CONFLICT (name) DO NOTHING;
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS stock_movements CASCADE;
DROP TABLE IF EXISTS invoice_lines CASCADE;
DROP TABLE IF EXISTS invoices CASCADE;
DROP TABLE IF EXISTS order_lines CASCADE;
DROP TABLE IF EXISTS orders CASCADE;
DROP TABLE IF EXISTS purchase_request_lines CASCADE;
DROP TABLE IF EXISTS purchase_requests CASCADE;
DROP TABLE IF EXISTS sale_lines CASCADE;
DROP TABLE IF EXISTS sales CASCADE;
DROP TABLE IF EXISTS cash_adjustment_lines CASCADE;
DROP TABLE IF EXISTS cash_adjustments CASCADE;
DROP TABLE IF EXISTS cash_transaction_lines CASCADE;
DROP TABLE IF EXISTS cash_transactions CASCADE;
DROP TABLE IF EXISTS cash_accounts CASCADE;
DROP TABLE IF EXISTS denominations CASCADE;
DROP TABLE IF EXISTS price_history CASCADE;
DROP TABLE IF EXISTS products CASCADE;
DROP TABLE IF EXISTS employees CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP TABLE IF EXISTS areas CASCADE;

DROP TYPE IF EXISTS sale_status;
DROP TYPE IF EXISTS document_status;
DROP TYPE IF EXISTS invoice_type;
DROP TYPE IF EXISTS settlement_status;
DROP TYPE IF EXISTS adjustment_kind;
DROP TYPE IF EXISTS cash_account_state;
DROP TYPE IF EXISTS cash_operation;
DROP TYPE IF EXISTS transaction_direction;
DROP TYPE IF EXISTS price_type;
DROP TYPE IF EXISTS product_state;
DROP TYPE IF EXISTS movement_operation;
DROP TYPE IF EXISTS movement_direction;
";
