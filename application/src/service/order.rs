use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{DependOnOrderQuery, OrderQuery};
use kernel::prelude::entity::Order;
use kernel::KernelError;

use crate::transfer::{GetAllOrderDto, GetOrderDto};

#[async_trait::async_trait]
pub trait GetOrderService: 'static + Sync + Send + DependOnOrderQuery {
    async fn get_order(&self, dto: &GetOrderDto) -> error_stack::Result<Option<Order>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let order = self.order_query().find_by_id(&mut connection, &dto.id).await?;
        connection.commit().await?;
        Ok(order)
    }

    async fn get_all_orders(
        &self,
        dto: &GetAllOrderDto,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let orders = self
            .order_query()
            .find_all(&mut connection, &dto.limit, &dto.offset)
            .await?;
        connection.commit().await?;
        Ok(orders)
    }
}

impl<T> GetOrderService for T where T: DependOnOrderQuery {}
