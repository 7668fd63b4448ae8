use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{BookQuery, CartQuery, DependOnBookQuery, DependOnCartQuery};
use kernel::interface::update::{
    BookModifier, CartModifier, DependOnBookModifier, DependOnCartModifier,
};
use kernel::prelude::entity::{
    Book, CartEntry, CartLine, CartQuantity, DestructCartEntry,
};
use kernel::KernelError;

use crate::transfer::{
    AddToCartDto, CartUpdate, CheckoutDto, CheckoutReceipt, GetCartDto, RemoveCartLineDto,
    UpdateCartLineDto,
};

fn ensure_supply(book: &Book, quantity: &CartQuantity) -> error_stack::Result<(), KernelError> {
    if book.can_supply(quantity) {
        Ok(())
    } else {
        Err(Report::new(KernelError::InsufficientStock(book.title().clone())))
    }
}

#[async_trait::async_trait]
pub trait GetCartService: 'static + Sync + Send + DependOnCartQuery {
    async fn get_cart(&self, dto: &GetCartDto) -> error_stack::Result<Vec<CartEntry>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let entries = self
            .cart_query()
            .find_pending(&mut connection, &dto.user_id)
            .await?;
        connection.commit().await?;
        Ok(entries)
    }
}

impl<T> GetCartService for T where T: DependOnCartQuery {}

#[async_trait::async_trait]
pub trait AddToCartService:
    'static + Sync + Send + DependOnBookQuery + DependOnCartQuery + DependOnCartModifier
{
    /// Adding a book already pending in the cart sums the quantities.
    /// The stock check here is best effort; checkout checks again under lock.
    async fn add_to_cart(&self, dto: AddToCartDto) -> error_stack::Result<CartEntry, KernelError> {
        let quantity = CartQuantity::positive(dto.quantity)?;

        let mut connection = self.database_connection().transact().await?;
        let book = self
            .book_query()
            .find_by_id(&mut connection, &dto.book_id)
            .await?
            .ok_or_else(|| Report::new(KernelError::NotFound("Book")))?;

        let existing = self
            .cart_query()
            .find_pending_by_book(&mut connection, &dto.user_id, &dto.book_id)
            .await?;
        let line = match existing {
            Some(mut line) => {
                let merged = line.quantity().merge(&quantity)?;
                ensure_supply(&book, &merged)?;
                line.substitute(|line| *line.quantity = merged);
                self.cart_modifier()
                    .update_quantity(&mut connection, &line)
                    .await?;
                line
            }
            None => {
                ensure_supply(&book, &quantity)?;
                let line = CartLine::pending(dto.user_id, dto.book_id, quantity);
                self.cart_modifier().create(&mut connection, &line).await?;
                line
            }
        };
        connection.commit().await?;

        tracing::debug!(line = %line.id().as_ref(), quantity = line.quantity().as_ref(), "cart line saved");
        Ok(CartEntry::new(line, book))
    }
}

impl<T> AddToCartService for T where
    T: DependOnBookQuery + DependOnCartQuery + DependOnCartModifier
{
}

#[async_trait::async_trait]
pub trait UpdateCartService:
    'static + Sync + Send + DependOnCartQuery + DependOnCartModifier
{
    async fn update_cart_line(
        &self,
        dto: UpdateCartLineDto,
    ) -> error_stack::Result<CartUpdate, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let entry = self
            .cart_query()
            .find_pending_by_id(&mut connection, &dto.user_id, &dto.id)
            .await?
            .ok_or_else(|| Report::new(KernelError::NotFound("Cart item")))?;

        if dto.quantity <= 0 {
            self.cart_modifier()
                .delete(&mut connection, &dto.user_id, &dto.id)
                .await?;
            connection.commit().await?;
            return Ok(CartUpdate::Removed);
        }

        let quantity = CartQuantity::new(dto.quantity);
        let DestructCartEntry { mut line, book } = entry.into_destruct();
        ensure_supply(&book, &quantity)?;
        line.substitute(|line| *line.quantity = quantity);
        self.cart_modifier()
            .update_quantity(&mut connection, &line)
            .await?;
        connection.commit().await?;

        Ok(CartUpdate::Updated(CartEntry::new(line, book)))
    }

    async fn remove_cart_line(&self, dto: RemoveCartLineDto) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let deleted = self
            .cart_modifier()
            .delete(&mut connection, &dto.user_id, &dto.id)
            .await?;
        if !deleted {
            return Err(Report::new(KernelError::NotFound("Cart item")));
        }
        connection.commit().await?;
        Ok(())
    }
}

impl<T> UpdateCartService for T where T: DependOnCartQuery + DependOnCartModifier {}

#[async_trait::async_trait]
pub trait CheckoutService:
    'static + Sync + Send + DependOnCartQuery + DependOnCartModifier + DependOnBookModifier
{
    /// Turns every pending line of the user into a completed one and takes the
    /// quantities out of stock. Either all lines go through or nothing changes.
    async fn checkout(&self, dto: CheckoutDto) -> error_stack::Result<CheckoutReceipt, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let entries = self
            .cart_query()
            .find_pending_for_checkout(&mut connection, &dto.user_id)
            .await?;

        // Returning early drops the transaction, which rolls it back.
        if entries.is_empty() {
            return Err(Report::new(KernelError::EmptyCart));
        }

        let mut receipt = CheckoutReceipt { lines: 0, total: 0 };
        for entry in entries {
            let subtotal = entry.subtotal();
            let DestructCartEntry { mut line, mut book } = entry.into_destruct();

            if let Err(report) = book.withdraw(line.quantity()) {
                tracing::info!(user = %dto.user_id.as_ref(), book = %book.id().as_ref(), "checkout rejected");
                return Err(report);
            }
            self.book_modifier()
                .update_stock(&mut connection, &book)
                .await?;

            line.complete()?;
            self.cart_modifier().complete(&mut connection, &line).await?;

            receipt.lines += 1;
            receipt.total += subtotal;
        }
        connection.commit().await?;

        tracing::info!(
            user = %dto.user_id.as_ref(),
            lines = receipt.lines,
            total = receipt.total,
            "checkout completed"
        );
        Ok(receipt)
    }
}

impl<T> CheckoutService for T where
    T: DependOnCartQuery + DependOnCartModifier + DependOnBookModifier
{
}

#[cfg(test)]
mod test {
    use kernel::prelude::entity::{
        Book, BookAuthor, BookId, BookImage, BookPrice, BookStock, BookTitle, CartQuantity,
        CreatedAt,
    };
    use kernel::KernelError;

    use super::ensure_supply;

    #[test]
    fn supply_check_names_the_book() {
        let book = Book::new(
            BookId::new(uuid::Uuid::new_v4()),
            BookTitle::new("Mindset"),
            BookAuthor::new("Carol S. Dweck"),
            BookPrice::new(299),
            BookStock::new(5),
            BookImage::new("/images/mindset.jpg"),
            CreatedAt::now(),
        );
        assert!(ensure_supply(&book, &CartQuantity::new(5)).is_ok());
        let report = ensure_supply(&book, &CartQuantity::new(6)).unwrap_err();
        assert!(matches!(
            report.current_context(),
            KernelError::InsufficientStock(title) if title.as_ref() == "Mindset"
        ));
    }
}
