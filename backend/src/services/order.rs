//! Order service: the data-access layer for D.O. records and their movements
//!
//! Supplies fully populated [`Order`] snapshots to the storage alert
//! calculator and keeps warehouse stock in step with recorded movements.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{
    validate_checkpoints, validate_movement_quantities, validate_order_code, Movement,
    MovementKind, Order, OrderCheckpoints,
};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Order service for managing D.O. records and movements
#[derive(Clone)]
pub struct OrderService {
    db: PgPool,
}

/// Query parameters for listing orders
#[derive(Debug, Default, Deserialize)]
pub struct OrderQuery {
    pub search: Option<String>,
    pub active: Option<bool>,
}

/// Input for registering an order
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderInput {
    #[validate(length(min = 1, max = 32))]
    pub code: String,
    pub client_id: Uuid,
    pub agency_id: Option<Uuid>,
    #[validate(length(max = 200))]
    pub product: Option<String>,
    #[validate(length(max = 64))]
    pub bl_number: Option<String>,
    #[serde(flatten)]
    pub checkpoints: OrderCheckpoints,
}

/// Input for updating an order; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateOrderInput {
    pub client_id: Option<Uuid>,
    pub agency_id: Option<Uuid>,
    #[validate(length(max = 200))]
    pub product: Option<String>,
    #[validate(length(max = 64))]
    pub bl_number: Option<String>,
    /// `true` reopens a closed order
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub checkpoints: OrderCheckpoints,
}

/// Input for recording an intake or dispatch
#[derive(Debug, Deserialize, Validate)]
pub struct RecordMovementInput {
    pub kind: MovementKind,
    pub occurred_at: Option<DateTime<Utc>>,
    #[validate(range(min = 0))]
    pub packages: i32,
    pub gross_weight_kg: Decimal,
    pub warehouse_id: Option<Uuid>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, FromRow)]
struct OrderRow {
    id: Uuid,
    code: String,
    client_id: Option<Uuid>,
    client_name: String,
    agency_id: Option<Uuid>,
    agency_name: Option<String>,
    product: Option<String>,
    bl_number: Option<String>,
    intake_form: Option<String>,
    bl_release: Option<String>,
    free_zone_transfer: Option<String>,
    exit_form: Option<String>,
    storage_billing_date: Option<NaiveDate>,
    notes: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct MovementRow {
    id: Uuid,
    order_id: Uuid,
    kind: String,
    occurred_at: DateTime<Utc>,
    packages: i32,
    gross_weight_kg: Decimal,
    warehouse_id: Option<Uuid>,
    notes: Option<String>,
}

impl TryFrom<MovementRow> for Movement {
    type Error = AppError;

    fn try_from(row: MovementRow) -> Result<Self, Self::Error> {
        let kind = row
            .kind
            .parse::<MovementKind>()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(Movement {
            id: row.id,
            order_id: row.order_id,
            kind,
            occurred_at: row.occurred_at,
            packages: row.packages,
            gross_weight_kg: row.gross_weight_kg,
            warehouse_id: row.warehouse_id,
            notes: row.notes,
        })
    }
}

impl OrderRow {
    fn into_order(self, movements: Vec<Movement>) -> Order {
        Order {
            id: self.id,
            code: self.code,
            client_id: self.client_id,
            client_name: self.client_name,
            agency_id: self.agency_id,
            agency_name: self.agency_name,
            product: self.product,
            bl_number: self.bl_number,
            checkpoints: OrderCheckpoints {
                intake_form: self.intake_form,
                bl_release: self.bl_release,
                free_zone_transfer: self.free_zone_transfer,
                exit_form: self.exit_form,
                storage_billing_date: self.storage_billing_date,
                notes: self.notes,
            },
            is_active: self.is_active,
            movements,
            created_at: self.created_at,
        }
    }
}

const ORDER_COLUMNS: &str = r#"
    o.id, o.code, o.client_id, COALESCE(c.name, '---') AS client_name,
    o.agency_id, a.name AS agency_name, o.product, o.bl_number,
    o.intake_form, o.bl_release, o.free_zone_transfer, o.exit_form,
    o.storage_billing_date, o.notes, o.is_active, o.created_at
"#;

const ORDER_JOINS: &str = r#"
    FROM orders o
    LEFT JOIN clients c ON c.id = o.client_id
    LEFT JOIN clients a ON a.id = o.agency_id
"#;

const MOVEMENT_COLUMNS: &str =
    "id, order_id, kind, occurred_at, packages, gross_weight_kg, warehouse_id, notes";

impl OrderService {
    /// Create a new OrderService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List orders with their movements, newest first
    pub async fn list_orders(
        &self,
        query: &OrderQuery,
        client_scope: Option<Uuid>,
    ) -> AppResult<Vec<Order>> {
        let pattern = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));

        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            {ORDER_JOINS}
            WHERE ($1::uuid IS NULL OR o.client_id = $1)
              AND ($2::bool IS NULL OR o.is_active = $2)
              AND ($3::text IS NULL
                   OR o.code ILIKE $3 OR o.product ILIKE $3 OR o.bl_number ILIKE $3
                   OR c.name ILIKE $3 OR a.name ILIKE $3)
            ORDER BY o.created_at DESC
            "#
        ))
        .bind(client_scope)
        .bind(query.active)
        .bind(pattern)
        .fetch_all(&self.db)
        .await?;

        self.attach_movements(rows).await
    }

    /// Snapshot of open orders fed to the storage alert calculator
    pub async fn list_active_orders(&self, client_scope: Option<Uuid>) -> AppResult<Vec<Order>> {
        let query = OrderQuery {
            search: None,
            active: Some(true),
        };
        self.list_orders(&query, client_scope).await
    }

    /// Get a single order with its movements
    pub async fn get_order(&self, order_id: Uuid, client_scope: Option<Uuid>) -> AppResult<Order> {
        let row = self.fetch_order_row(order_id, client_scope).await?;
        let mut orders = self.attach_movements(vec![row]).await?;
        orders
            .pop()
            .ok_or_else(|| AppError::NotFound("Order".to_string()))
    }

    /// Register a new order
    pub async fn create_order(&self, input: CreateOrderInput) -> AppResult<Order> {
        input.validate()?;
        validate_order_code(&input.code).map_err(|m| AppError::invalid("code", m))?;
        validate_checkpoints(&input.checkpoints).map_err(|(field, m)| AppError::invalid(field, m))?;
        self.ensure_entity(input.client_id, EntityRole::Client).await?;
        if let Some(agency_id) = input.agency_id {
            self.ensure_entity(agency_id, EntityRole::Agency).await?;
        }

        let cp = &input.checkpoints;
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO orders (
                code, client_id, agency_id, product, bl_number,
                intake_form, bl_release, free_zone_transfer, exit_form,
                storage_billing_date, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(input.code.trim())
        .bind(input.client_id)
        .bind(input.agency_id)
        .bind(&input.product)
        .bind(&input.bl_number)
        .bind(&cp.intake_form)
        .bind(&cp.bl_release)
        .bind(&cp.free_zone_transfer)
        .bind(&cp.exit_form)
        .bind(cp.storage_billing_date)
        .bind(&cp.notes)
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::from_insert(e, "code"))?;

        tracing::info!(order_id = %id, code = %input.code.trim(), "order registered");
        self.get_order(id, None).await
    }

    /// Update an order; a closed order is reopened with `is_active: true`
    pub async fn update_order(&self, order_id: Uuid, input: UpdateOrderInput) -> AppResult<Order> {
        input.validate()?;
        validate_checkpoints(&input.checkpoints).map_err(|(field, m)| AppError::invalid(field, m))?;
        if let Some(client_id) = input.client_id {
            self.ensure_entity(client_id, EntityRole::Client).await?;
        }
        if let Some(agency_id) = input.agency_id {
            self.ensure_entity(agency_id, EntityRole::Agency).await?;
        }

        let current = self.fetch_order_row(order_id, None).await?.into_order(Vec::new());
        let mut checkpoints = current.checkpoints;
        checkpoints.merge(input.checkpoints);
        let is_active = input.is_active.unwrap_or(current.is_active);

        sqlx::query(
            r#"
            UPDATE orders
            SET client_id = COALESCE($2, client_id),
                agency_id = COALESCE($3, agency_id),
                product = COALESCE($4, product),
                bl_number = COALESCE($5, bl_number),
                intake_form = $6,
                bl_release = $7,
                free_zone_transfer = $8,
                exit_form = $9,
                storage_billing_date = $10,
                notes = $11,
                is_active = $12
            WHERE id = $1
            "#,
        )
        .bind(order_id)
        .bind(input.client_id)
        .bind(input.agency_id)
        .bind(&input.product)
        .bind(&input.bl_number)
        .bind(&checkpoints.intake_form)
        .bind(&checkpoints.bl_release)
        .bind(&checkpoints.free_zone_transfer)
        .bind(&checkpoints.exit_form)
        .bind(checkpoints.storage_billing_date)
        .bind(&checkpoints.notes)
        .bind(is_active)
        .execute(&self.db)
        .await?;

        if is_active != current.is_active {
            tracing::info!(order_id = %order_id, is_active, "order status changed");
        }

        self.get_order(order_id, None).await
    }

    /// Close an order; closed orders no longer raise storage alerts
    pub async fn deactivate_order(&self, order_id: Uuid) -> AppResult<Order> {
        let result = sqlx::query("UPDATE orders SET is_active = FALSE WHERE id = $1")
            .bind(order_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Order".to_string()));
        }

        tracing::info!(order_id = %order_id, "order closed");
        self.get_order(order_id, None).await
    }

    /// Movements of an order, oldest first
    pub async fn list_movements(
        &self,
        order_id: Uuid,
        client_scope: Option<Uuid>,
    ) -> AppResult<Vec<Movement>> {
        let mut order = self.get_order(order_id, client_scope).await?;
        order.movements.sort_by_key(|m| m.occurred_at);
        Ok(order.movements)
    }

    /// Record an intake or dispatch and adjust warehouse stock
    pub async fn record_movement(
        &self,
        order_id: Uuid,
        input: RecordMovementInput,
    ) -> AppResult<Movement> {
        input.validate()?;
        validate_movement_quantities(input.packages, input.gross_weight_kg)
            .map_err(|m| AppError::invalid("packages", m))?;

        let order = self.fetch_order_row(order_id, None).await?;
        if !order.is_active {
            return Err(AppError::InvalidStateTransition(format!(
                "Order {} is closed",
                order.code
            )));
        }

        let occurred_at = input.occurred_at.unwrap_or_else(Utc::now);
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, MovementRow>(&format!(
            r#"
            INSERT INTO movements (order_id, kind, occurred_at, packages, gross_weight_kg, warehouse_id, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {MOVEMENT_COLUMNS}
            "#
        ))
        .bind(order_id)
        .bind(input.kind.as_str())
        .bind(occurred_at)
        .bind(input.packages)
        .bind(input.gross_weight_kg)
        .bind(input.warehouse_id)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(warehouse_id) = input.warehouse_id {
            adjust_stock(&mut tx, warehouse_id, order_id, &input).await?;
        }

        tx.commit().await?;

        tracing::info!(
            order_id = %order_id,
            kind = %input.kind,
            packages = input.packages,
            "movement recorded"
        );

        Movement::try_from(row)
    }

    async fn fetch_order_row(&self, order_id: Uuid, client_scope: Option<Uuid>) -> AppResult<OrderRow> {
        sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            {ORDER_JOINS}
            WHERE o.id = $1 AND ($2::uuid IS NULL OR o.client_id = $2)
            "#
        ))
        .bind(order_id)
        .bind(client_scope)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))
    }

    async fn ensure_entity(&self, entity_id: Uuid, role: EntityRole) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS(SELECT 1 FROM clients WHERE id = $1 AND {})",
            role.flag_column()
        ))
        .bind(entity_id)
        .fetch_one(&self.db)
        .await?;

        if !exists {
            return Err(AppError::NotFound(role.resource_name().to_string()));
        }
        Ok(())
    }

    /// Load movements for all rows in one query and group them per order
    async fn attach_movements(&self, rows: Vec<OrderRow>) -> AppResult<Vec<Order>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let movement_rows = sqlx::query_as::<_, MovementRow>(&format!(
            "SELECT {MOVEMENT_COLUMNS} FROM movements WHERE order_id = ANY($1) ORDER BY occurred_at"
        ))
        .bind(&ids)
        .fetch_all(&self.db)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load movements for {} orders: {}", ids.len(), e);
            AppError::DatabaseError(e)
        })?;

        let mut by_order: HashMap<Uuid, Vec<Movement>> = HashMap::new();
        for row in movement_rows {
            let movement = Movement::try_from(row)?;
            by_order.entry(movement.order_id).or_default().push(movement);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let movements = by_order.remove(&row.id).unwrap_or_default();
                row.into_order(movements)
            })
            .collect())
    }
}

/// Registry flag an entity referenced by an order must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntityRole {
    Client,
    Agency,
}

impl EntityRole {
    fn flag_column(self) -> &'static str {
        match self {
            EntityRole::Client => "is_client",
            EntityRole::Agency => "is_agency",
        }
    }

    fn resource_name(self) -> &'static str {
        match self {
            EntityRole::Client => "Client",
            EntityRole::Agency => "Customs agency",
        }
    }
}

/// Apply a movement to the order's stock line in a warehouse
async fn adjust_stock(
    tx: &mut Transaction<'_, Postgres>,
    warehouse_id: Uuid,
    order_id: Uuid,
    input: &RecordMovementInput,
) -> AppResult<()> {
    let (packages, weight) = match input.kind {
        MovementKind::Intake => (input.packages, input.gross_weight_kg),
        MovementKind::Dispatch => (-input.packages, -input.gross_weight_kg),
    };

    let remaining = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO inventory (warehouse_id, order_id, packages, current_weight_kg)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (warehouse_id, order_id) DO UPDATE
        SET packages = inventory.packages + EXCLUDED.packages,
            current_weight_kg = inventory.current_weight_kg + EXCLUDED.current_weight_kg,
            updated_at = NOW()
        RETURNING packages
        "#,
    )
    .bind(warehouse_id)
    .bind(order_id)
    .bind(packages)
    .bind(weight)
    .fetch_one(&mut **tx)
    .await?;

    if remaining < 0 {
        return Err(AppError::InvalidStateTransition(format!(
            "Dispatch exceeds stock in warehouse by {} packages",
            -remaining
        )));
    }
    Ok(())
}
