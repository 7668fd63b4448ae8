use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::OrderQuery;
use kernel::prelude::entity::{
    BookPrice, BookTitle, CartLineId, CartQuantity, CartStatus, CreatedAt, Order, SelectLimit,
    SelectOffset, UserId, UserName,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresOrderRepository;

#[async_trait::async_trait]
impl OrderQuery for PostgresOrderRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &CartLineId,
    ) -> error_stack::Result<Option<Order>, KernelError> {
        PgOrderInternal::find_by_id(con, id).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        PgOrderInternal::find_all(con, limit, offset).await
    }

    async fn find_by_user(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        PgOrderInternal::find_by_user(con, user_id).await
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    user_id: Uuid,
    user_name: String,
    book_title: String,
    price: i32,
    quantity: i32,
    status: String,
    created_at: OffsetDateTime,
}

impl TryFrom<OrderRow> for Order {
    type Error = error_stack::Report<KernelError>;
    fn try_from(value: OrderRow) -> Result<Self, Self::Error> {
        Ok(Order::new(
            CartLineId::new(value.id),
            UserId::new(value.user_id),
            UserName::new(value.user_name),
            BookTitle::new(value.book_title),
            BookPrice::new(value.price),
            CartQuantity::new(value.quantity),
            value.status.parse::<CartStatus>()?,
            CreatedAt::new(value.created_at),
        ))
    }
}

pub(in crate::database) struct PgOrderInternal;

impl PgOrderInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &CartLineId,
    ) -> error_stack::Result<Option<Order>, KernelError> {
        let row = sqlx::query_as::<_, OrderRow>(
            // language=postgresql
            r#"
            SELECT c.id, c.user_id, u.name AS user_name, b.title AS book_title, b.price,
                   c.quantity, c.status, c.created_at
            FROM cart_lines c
            JOIN users u ON u.id = c.user_id
            JOIN books b ON b.id = c.book_id
            WHERE c.id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Order::try_from).transpose()
    }

    async fn find_all(
        con: &mut PgConnection,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            // language=postgresql
            r#"
            SELECT c.id, c.user_id, u.name AS user_name, b.title AS book_title, b.price,
                   c.quantity, c.status, c.created_at
            FROM cart_lines c
            JOIN users u ON u.id = c.user_id
            JOIN books b ON b.id = c.book_id
            ORDER BY c.created_at DESC, c.id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit.as_ref())
        .bind(offset.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(Order::try_from).collect()
    }

    async fn find_by_user(
        con: &mut PgConnection,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            // language=postgresql
            r#"
            SELECT c.id, c.user_id, u.name AS user_name, b.title AS book_title, b.price,
                   c.quantity, c.status, c.created_at
            FROM cart_lines c
            JOIN users u ON u.id = c.user_id
            JOIN books b ON b.id = c.book_id
            WHERE c.user_id = $1
            ORDER BY c.created_at DESC, c.id
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(Order::try_from).collect()
    }
}

#[cfg(test)]
mod test {
    use application::service::{AddToCartService, CheckoutService, GetOrderService};
    use application::transfer::{AddToCartDto, CheckoutDto, GetOrderDto};
    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::OrderQuery;
    use kernel::prelude::entity::CartStatus;
    use kernel::KernelError;

    use crate::database::postgres::order::PostgresOrderRepository;
    use crate::database::postgres::{fixture, PostgresDatabase};

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn test() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let (user, book) = fixture::seed(&db, 4).await?;
        let entry = db
            .add_to_cart(AddToCartDto {
                user_id: user.id().clone(),
                book_id: book.id().clone(),
                quantity: 2,
            })
            .await?;
        let id = entry.line().id().clone();

        let order = db
            .get_order(&GetOrderDto { id: id.clone() })
            .await?
            .expect("cart line is listed as an order");
        assert_eq!(order.status(), &CartStatus::Pending);
        assert_eq!(order.user_name(), user.name());
        assert_eq!(order.total_price(), 600);

        db.checkout(CheckoutDto {
            user_id: user.id().clone(),
        })
        .await?;

        let mut con = db.transact().await?;
        let orders = PostgresOrderRepository.find_by_user(&mut con, user.id()).await?;
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].status(), &CartStatus::Completed);
        assert_eq!(orders[0].book_title(), book.title());
        Ok(())
    }
}
