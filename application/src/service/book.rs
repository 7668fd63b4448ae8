use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{BookQuery, DependOnBookQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{
    Book, BookAuthor, BookId, BookImage, BookPrice, BookStock, BookTitle, CartQuantity, CreatedAt,
};
use kernel::KernelError;

use crate::transfer::{
    CreateBookDto, DeleteBookDto, GetAllBookDto, GetBookDto, TakeBookDto, UpdateStockDto,
};

fn validate_stock(stock: i32) -> error_stack::Result<BookStock, KernelError> {
    if stock < 0 {
        return Err(Report::new(KernelError::Validation(
            "Invalid stock value".to_string(),
        )));
    }
    Ok(BookStock::new(stock))
}

#[async_trait::async_trait]
pub trait GetBookService: 'static + Sync + Send + DependOnBookQuery {
    async fn get_book(&self, dto: &GetBookDto) -> error_stack::Result<Option<Book>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let book = self.book_query().find_by_id(&mut connection, &dto.id).await?;
        connection.commit().await?;
        Ok(book)
    }

    async fn get_all_books(
        &self,
        dto: &GetAllBookDto,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let books = self
            .book_query()
            .find_all(&mut connection, &dto.limit, &dto.offset)
            .await?;
        connection.commit().await?;
        Ok(books)
    }
}

impl<T> GetBookService for T where T: DependOnBookQuery {}

#[async_trait::async_trait]
pub trait CreateBookService: 'static + Sync + Send + DependOnBookModifier {
    async fn create_book(&self, dto: CreateBookDto) -> error_stack::Result<BookId, KernelError> {
        if dto.title.trim().is_empty() || dto.author.trim().is_empty() {
            return Err(Report::new(KernelError::Validation(
                "Title and author are required".to_string(),
            )));
        }
        if dto.price < 0 {
            return Err(Report::new(KernelError::Validation(
                "Invalid price value".to_string(),
            )));
        }
        let stock = validate_stock(dto.stock)?;

        let mut connection = self.database_connection().transact().await?;
        let book = Book::new(
            BookId::new(uuid::Uuid::new_v4()),
            BookTitle::new(dto.title),
            BookAuthor::new(dto.author),
            BookPrice::new(dto.price),
            stock,
            BookImage::new(dto.image),
            CreatedAt::now(),
        );
        self.book_modifier().create(&mut connection, &book).await?;
        connection.commit().await?;

        tracing::info!(book = %book.id().as_ref(), title = %book.title().as_ref(), "book created");
        Ok(book.id().clone())
    }
}

impl<T> CreateBookService for T where T: DependOnBookModifier {}

#[async_trait::async_trait]
pub trait DeleteBookService: 'static + Sync + Send + DependOnBookModifier {
    async fn delete_book(&self, dto: DeleteBookDto) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let deleted = self.book_modifier().delete(&mut connection, &dto.id).await?;
        if !deleted {
            return Err(Report::new(KernelError::NotFound("Book")));
        }
        connection.commit().await?;
        tracing::info!(book = %dto.id.as_ref(), "book deleted");
        Ok(())
    }
}

impl<T> DeleteBookService for T where T: DependOnBookModifier {}

/// Every stock edit outside checkout goes through here, under the same row lock.
#[async_trait::async_trait]
pub trait UpdateStockService:
    'static + Sync + Send + DependOnBookQuery + DependOnBookModifier
{
    async fn set_stock(&self, dto: UpdateStockDto) -> error_stack::Result<Book, KernelError> {
        let stock = validate_stock(dto.stock)?;

        let mut connection = self.database_connection().transact().await?;
        let mut book = self
            .book_query()
            .find_by_id_for_update(&mut connection, &dto.id)
            .await?
            .ok_or_else(|| Report::new(KernelError::NotFound("Book")))?;
        book.substitute(|book| *book.stock = stock);
        self.book_modifier()
            .update_stock(&mut connection, &book)
            .await?;
        connection.commit().await?;

        tracing::info!(book = %dto.id.as_ref(), stock = dto.stock, "stock set");
        Ok(book)
    }

    async fn take_one(&self, dto: TakeBookDto) -> error_stack::Result<Book, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let mut book = self
            .book_query()
            .find_by_id_for_update(&mut connection, &dto.id)
            .await?
            .ok_or_else(|| Report::new(KernelError::NotFound("Book")))?;
        book.withdraw(&CartQuantity::new(1))?;
        self.book_modifier()
            .update_stock(&mut connection, &book)
            .await?;
        connection.commit().await?;
        Ok(book)
    }
}

impl<T> UpdateStockService for T where T: DependOnBookQuery + DependOnBookModifier {}

#[cfg(test)]
mod test {
    use kernel::KernelError;

    use super::validate_stock;

    #[test]
    fn negative_stock_is_rejected() {
        let report = validate_stock(-1).unwrap_err();
        assert!(matches!(report.current_context(), KernelError::Validation(_)));
        assert_eq!(*validate_stock(0).unwrap().as_ref(), 0);
    }
}
