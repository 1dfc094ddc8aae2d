use std::sync::Arc;

use async_trait::async_trait;

use crate::account::models::AccountId;
use crate::book::models::BookId;
use crate::book::ports::BookRepository;
use crate::cart::errors::CartError;
use crate::cart::models::CartLine;
use crate::cart::models::CartLineId;
use crate::cart::models::CartLineView;
use crate::cart::models::Quantity;
use crate::cart::ports::CartRepository;
use crate::cart::ports::CartServicePort;

/// Cart rules: positive quantities, stock limits, one line per book, and
/// per-account isolation of lines.
///
/// The caller's account id is trusted; token validation happens upstream.
pub struct CartService<CR, BR>
where
    CR: CartRepository,
    BR: BookRepository,
{
    lines: Arc<CR>,
    books: Arc<BR>,
}

impl<CR, BR> CartService<CR, BR>
where
    CR: CartRepository,
    BR: BookRepository,
{
    /// Create a new cart service with injected dependencies.
    ///
    /// # Arguments
    /// * `lines` - Cart line persistence implementation
    /// * `books` - Catalog lookups for stock checks
    pub fn new(lines: Arc<CR>, books: Arc<BR>) -> Self {
        Self { lines, books }
    }
}

#[async_trait]
impl<CR, BR> CartServicePort for CartService<CR, BR>
where
    CR: CartRepository,
    BR: BookRepository,
{
    async fn add_item(
        &self,
        account_id: &AccountId,
        book_id: &BookId,
        quantity: i32,
    ) -> Result<CartLine, CartError> {
        let quantity = Quantity::new(quantity)?;

        let book = self
            .books
            .find_live_by_id(book_id)
            .await?
            .ok_or_else(|| CartError::BookNotFound(book_id.to_string()))?;

        if book.stock.value() < quantity.value() {
            tracing::debug!(
                book_id = %book_id,
                requested = quantity.value(),
                available = book.stock.value(),
                "Add to cart rejected: not enough stock"
            );
            return Err(CartError::InsufficientStock {
                requested: quantity.value(),
                available: book.stock.value(),
            });
        }

        // Merge and the running-total stock check happen in one statement.
        let candidate = CartLine::new(*account_id, *book_id, quantity);
        match self.lines.add_or_increment(candidate).await? {
            Some(line) => {
                tracing::debug!(
                    account_id = %account_id,
                    line_id = %line.id,
                    quantity = line.quantity.value(),
                    "Cart line stored"
                );
                Ok(line)
            }
            None => {
                // No row means the book went away or the total exceeds stock.
                let current = self
                    .books
                    .find_live_by_id(book_id)
                    .await?
                    .ok_or_else(|| CartError::BookNotFound(book_id.to_string()))?;

                tracing::debug!(
                    book_id = %book_id,
                    requested = quantity.value(),
                    available = current.stock.value(),
                    "Add to cart rejected: line total would exceed stock"
                );
                Err(CartError::InsufficientStock {
                    requested: quantity.value(),
                    available: current.stock.value(),
                })
            }
        }
    }

    async fn list_items(&self, account_id: &AccountId) -> Result<Vec<CartLineView>, CartError> {
        self.lines.list_for_account(account_id).await
    }

    async fn update_item(
        &self,
        account_id: &AccountId,
        item_id: &CartLineId,
        quantity: i32,
    ) -> Result<CartLine, CartError> {
        let quantity = Quantity::new(quantity)?;

        self.lines.set_quantity(account_id, item_id, quantity).await
    }

    async fn remove_item(
        &self,
        account_id: &AccountId,
        item_id: &CartLineId,
    ) -> Result<(), CartError> {
        self.lines.delete(account_id, item_id).await?;
        tracing::debug!(account_id = %account_id, line_id = %item_id, "Cart line removed");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::book::errors::BookError;
    use crate::book::models::Book;
    use crate::book::models::BookTitle;
    use crate::book::models::Price;
    use crate::book::models::Stock;
    use crate::book::models::UpdateBookCommand;
    use crate::cart::models::CartBookSummary;

    mock! {
        pub TestCartRepository {}

        #[async_trait]
        impl CartRepository for TestCartRepository {
            async fn add_or_increment(&self, line: CartLine) -> Result<Option<CartLine>, CartError>;
            async fn list_for_account(&self, account_id: &AccountId) -> Result<Vec<CartLineView>, CartError>;
            async fn set_quantity(&self, account_id: &AccountId, id: &CartLineId, quantity: Quantity) -> Result<CartLine, CartError>;
            async fn delete(&self, account_id: &AccountId, id: &CartLineId) -> Result<(), CartError>;
        }
    }

    mock! {
        pub TestBookRepository {}

        #[async_trait]
        impl BookRepository for TestBookRepository {
            async fn create(&self, book: Book) -> Result<Book, BookError>;
            async fn find_live_by_id(&self, id: &BookId) -> Result<Option<Book>, BookError>;
            async fn list_live(&self) -> Result<Vec<Book>, BookError>;
            async fn update(&self, id: &BookId, command: UpdateBookCommand) -> Result<Book, BookError>;
            async fn soft_delete(&self, id: &BookId) -> Result<(), BookError>;
        }
    }

    fn book_with_stock(stock: i32) -> Book {
        Book {
            id: BookId::new(),
            title: BookTitle::new("Clean Code".to_string()).unwrap(),
            author: "Robert C. Martin".to_string(),
            price: Price::new(990).unwrap(),
            stock: Stock::new(stock).unwrap(),
            description: String::new(),
            image_url: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Catalog and cart tables behind one lock, mirroring the single-statement
    /// semantics of the Postgres adapter.
    #[derive(Default)]
    struct InMemoryStore {
        books: Mutex<HashMap<BookId, Book>>,
        lines: Mutex<Vec<CartLine>>,
    }

    impl InMemoryStore {
        fn with_book(book: &Book) -> Self {
            let store = Self::default();
            store.books.lock().unwrap().insert(book.id, book.clone());
            store
        }

        fn lines_for(&self, account_id: &AccountId, book_id: &BookId) -> Vec<CartLine> {
            self.lines
                .lock()
                .unwrap()
                .iter()
                .filter(|l| l.account_id == *account_id && l.book_id == *book_id)
                .cloned()
                .collect()
        }
    }

    #[async_trait]
    impl BookRepository for InMemoryStore {
        async fn create(&self, book: Book) -> Result<Book, BookError> {
            self.books.lock().unwrap().insert(book.id, book.clone());
            Ok(book)
        }

        async fn find_live_by_id(&self, id: &BookId) -> Result<Option<Book>, BookError> {
            Ok(self.books.lock().unwrap().get(id).cloned())
        }

        async fn list_live(&self) -> Result<Vec<Book>, BookError> {
            Ok(self.books.lock().unwrap().values().cloned().collect())
        }

        async fn update(&self, id: &BookId, command: UpdateBookCommand) -> Result<Book, BookError> {
            let mut books = self.books.lock().unwrap();
            let book = books
                .get_mut(id)
                .ok_or_else(|| BookError::NotFound(id.to_string()))?;
            if let Some(stock) = command.stock {
                book.stock = stock;
            }
            Ok(book.clone())
        }

        async fn soft_delete(&self, id: &BookId) -> Result<(), BookError> {
            self.books
                .lock()
                .unwrap()
                .remove(id)
                .map(|_| ())
                .ok_or_else(|| BookError::NotFound(id.to_string()))
        }
    }

    #[async_trait]
    impl CartRepository for InMemoryStore {
        async fn add_or_increment(&self, line: CartLine) -> Result<Option<CartLine>, CartError> {
            let books = self.books.lock().unwrap();
            let mut lines = self.lines.lock().unwrap();

            let stock = match books.get(&line.book_id) {
                Some(book) => book.stock.value(),
                None => return Ok(None),
            };

            if let Some(existing) = lines
                .iter_mut()
                .find(|l| l.account_id == line.account_id && l.book_id == line.book_id)
            {
                let total = existing.quantity.value() + line.quantity.value();
                if total > stock {
                    return Ok(None);
                }
                existing.quantity = Quantity::new(total)?;
                existing.updated_at = line.updated_at;
                return Ok(Some(existing.clone()));
            }

            if line.quantity.value() > stock {
                return Ok(None);
            }
            lines.push(line.clone());
            Ok(Some(line))
        }

        async fn list_for_account(
            &self,
            account_id: &AccountId,
        ) -> Result<Vec<CartLineView>, CartError> {
            let books = self.books.lock().unwrap();
            let lines = self.lines.lock().unwrap();

            Ok(lines
                .iter()
                .filter(|l| l.account_id == *account_id)
                .filter_map(|l| {
                    books.get(&l.book_id).map(|b| CartLineView {
                        line: l.clone(),
                        book: CartBookSummary {
                            title: b.title.as_str().to_string(),
                            author: b.author.clone(),
                            price: b.price.value(),
                            image_url: b.image_url.clone(),
                            stock: b.stock.value(),
                            available: true,
                        },
                    })
                })
                .collect())
        }

        async fn set_quantity(
            &self,
            account_id: &AccountId,
            id: &CartLineId,
            quantity: Quantity,
        ) -> Result<CartLine, CartError> {
            let mut lines = self.lines.lock().unwrap();
            let line = lines
                .iter_mut()
                .find(|l| l.id == *id && l.account_id == *account_id)
                .ok_or(CartError::NotFound)?;
            line.quantity = quantity;
            Ok(line.clone())
        }

        async fn delete(&self, account_id: &AccountId, id: &CartLineId) -> Result<(), CartError> {
            let mut lines = self.lines.lock().unwrap();
            let before = lines.len();
            lines.retain(|l| !(l.id == *id && l.account_id == *account_id));
            if lines.len() == before {
                return Err(CartError::NotFound);
            }
            Ok(())
        }
    }

    fn in_memory_service(
        book: &Book,
    ) -> (
        Arc<InMemoryStore>,
        CartService<InMemoryStore, InMemoryStore>,
    ) {
        let store = Arc::new(InMemoryStore::with_book(book));
        let service = CartService::new(Arc::clone(&store), Arc::clone(&store));
        (store, service)
    }

    #[tokio::test]
    async fn test_add_creates_then_merges_line() {
        let book = book_with_stock(5);
        let (store, service) = in_memory_service(&book);
        let account = AccountId::new();

        let first = service.add_item(&account, &book.id, 3).await.unwrap();
        assert_eq!(first.quantity.value(), 3);

        let second = service.add_item(&account, &book.id, 2).await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.quantity.value(), 5);

        let lines = store.lines_for(&account, &book.id);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity.value(), 5);
    }

    #[tokio::test]
    async fn test_add_more_than_stock_changes_nothing() {
        let book = book_with_stock(5);
        let (store, service) = in_memory_service(&book);
        let account = AccountId::new();

        let result = service.add_item(&account, &book.id, 6).await;
        assert!(matches!(
            result,
            Err(CartError::InsufficientStock {
                requested: 6,
                available: 5
            })
        ));
        assert!(store.lines_for(&account, &book.id).is_empty());

        service.add_item(&account, &book.id, 4).await.unwrap();
        let result = service.add_item(&account, &book.id, 6).await;
        assert!(matches!(result, Err(CartError::InsufficientStock { .. })));
        assert_eq!(store.lines_for(&account, &book.id)[0].quantity.value(), 4);
    }

    #[tokio::test]
    async fn test_add_total_above_stock_is_rejected() {
        let book = book_with_stock(5);
        let (store, service) = in_memory_service(&book);
        let account = AccountId::new();

        service.add_item(&account, &book.id, 4).await.unwrap();
        let result = service.add_item(&account, &book.id, 2).await;

        assert!(matches!(result, Err(CartError::InsufficientStock { .. })));
        assert_eq!(store.lines_for(&account, &book.id)[0].quantity.value(), 4);
    }

    #[tokio::test]
    async fn test_stock_is_not_consumed_across_accounts() {
        let book = book_with_stock(1);
        let (_store, service) = in_memory_service(&book);

        assert!(service.add_item(&AccountId::new(), &book.id, 1).await.is_ok());
        assert!(service.add_item(&AccountId::new(), &book.id, 1).await.is_ok());
    }

    #[tokio::test]
    async fn test_add_rejects_non_positive_quantity() {
        let mut lines = MockTestCartRepository::new();
        let mut books = MockTestBookRepository::new();
        lines.expect_add_or_increment().times(0);
        books.expect_find_live_by_id().times(0);

        let service = CartService::new(Arc::new(lines), Arc::new(books));

        for quantity in [0, -1] {
            let result = service
                .add_item(&AccountId::new(), &BookId::new(), quantity)
                .await;
            assert!(matches!(result, Err(CartError::InvalidQuantity(_))));
        }
    }

    #[tokio::test]
    async fn test_add_unknown_or_deleted_book() {
        let mut lines = MockTestCartRepository::new();
        let mut books = MockTestBookRepository::new();
        lines.expect_add_or_increment().times(0);
        books
            .expect_find_live_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = CartService::new(Arc::new(lines), Arc::new(books));

        let result = service.add_item(&AccountId::new(), &BookId::new(), 1).await;
        assert!(matches!(result, Err(CartError::BookNotFound(_))));
    }

    #[tokio::test]
    async fn test_book_deleted_before_upsert_is_book_not_found() {
        let book = book_with_stock(3);
        let mut lines = MockTestCartRepository::new();
        let mut books = MockTestBookRepository::new();

        let mut lookups = 0;
        books.expect_find_live_by_id().times(2).returning(move |_| {
            lookups += 1;
            if lookups == 1 {
                Ok(Some(book.clone()))
            } else {
                Ok(None)
            }
        });
        lines
            .expect_add_or_increment()
            .times(1)
            .returning(|_| Ok(None));

        let service = CartService::new(Arc::new(lines), Arc::new(books));

        let result = service.add_item(&AccountId::new(), &BookId::new(), 1).await;
        assert!(matches!(result, Err(CartError::BookNotFound(_))));
    }

    #[tokio::test]
    async fn test_rejected_upsert_reports_current_stock() {
        let book = book_with_stock(3);
        let mut lines = MockTestCartRepository::new();
        let mut books = MockTestBookRepository::new();

        let mut lookups = 0;
        books.expect_find_live_by_id().times(2).returning(move |_| {
            lookups += 1;
            let mut current = book.clone();
            if lookups > 1 {
                current.stock = Stock::new(1).unwrap();
            }
            Ok(Some(current))
        });
        lines
            .expect_add_or_increment()
            .times(1)
            .returning(|_| Ok(None));

        let service = CartService::new(Arc::new(lines), Arc::new(books));

        let result = service.add_item(&AccountId::new(), &BookId::new(), 2).await;
        assert!(matches!(
            result,
            Err(CartError::InsufficientStock {
                requested: 2,
                available: 1
            })
        ));
    }

    #[tokio::test]
    async fn test_add_storage_failure_propagates() {
        let book = book_with_stock(3);
        let mut lines = MockTestCartRepository::new();
        let mut books = MockTestBookRepository::new();

        books
            .expect_find_live_by_id()
            .returning(move |_| Ok(Some(book.clone())));
        lines
            .expect_add_or_increment()
            .times(1)
            .returning(|_| Err(CartError::DatabaseError("deadlock".to_string())));

        let service = CartService::new(Arc::new(lines), Arc::new(books));

        let result = service.add_item(&AccountId::new(), &BookId::new(), 1).await;
        assert!(matches!(result, Err(CartError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_concurrent_adds_merge_into_one_line() {
        const CALLERS: i32 = 32;

        let book = book_with_stock(CALLERS);
        let (store, service) = in_memory_service(&book);
        let service = Arc::new(service);
        let account = AccountId::new();

        let tasks: Vec<_> = (0..CALLERS)
            .map(|_| {
                let service = Arc::clone(&service);
                let book_id = book.id;
                tokio::spawn(async move { service.add_item(&account, &book_id, 1).await })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let lines = store.lines_for(&account, &book.id);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity.value(), CALLERS);
    }

    #[tokio::test]
    async fn test_update_sets_absolute_quantity() {
        let book = book_with_stock(10);
        let (_store, service) = in_memory_service(&book);
        let account = AccountId::new();

        let line = service.add_item(&account, &book.id, 3).await.unwrap();
        let updated = service.update_item(&account, &line.id, 7).await.unwrap();

        assert_eq!(updated.quantity.value(), 7);
    }

    #[tokio::test]
    async fn test_update_rejects_zero() {
        let mut lines = MockTestCartRepository::new();
        lines.expect_set_quantity().times(0);

        let service = CartService::new(Arc::new(lines), Arc::new(MockTestBookRepository::new()));

        let result = service
            .update_item(&AccountId::new(), &CartLineId::new(), 0)
            .await;
        assert!(matches!(result, Err(CartError::InvalidQuantity(_))));
    }

    #[tokio::test]
    async fn test_other_account_cannot_touch_line() {
        let book = book_with_stock(10);
        let (store, service) = in_memory_service(&book);
        let owner = AccountId::new();
        let intruder = AccountId::new();

        let line = service.add_item(&owner, &book.id, 2).await.unwrap();

        let update = service.update_item(&intruder, &line.id, 5).await;
        assert!(matches!(update, Err(CartError::NotFound)));

        let remove = service.remove_item(&intruder, &line.id).await;
        assert!(matches!(remove, Err(CartError::NotFound)));

        assert!(service.list_items(&intruder).await.unwrap().is_empty());
        assert_eq!(store.lines_for(&owner, &book.id)[0].quantity.value(), 2);
    }

    #[tokio::test]
    async fn test_remove_twice() {
        let book = book_with_stock(10);
        let (_store, service) = in_memory_service(&book);
        let account = AccountId::new();

        let line = service.add_item(&account, &book.id, 1).await.unwrap();

        assert!(service.remove_item(&account, &line.id).await.is_ok());
        assert!(matches!(
            service.remove_item(&account, &line.id).await,
            Err(CartError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_items_joins_book() {
        let book = book_with_stock(10);
        let (_store, service) = in_memory_service(&book);
        let account = AccountId::new();

        service.add_item(&account, &book.id, 2).await.unwrap();
        let items = service.list_items(&account).await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].line.quantity.value(), 2);
        assert_eq!(items[0].book.title, "Clean Code");
        assert_eq!(items[0].book.price, 990);
    }

    #[test]
    fn test_book_errors_map_to_cart_errors() {
        assert!(matches!(
            CartError::from(BookError::DatabaseError("x".to_string())),
            CartError::DatabaseError(_)
        ));
        assert!(matches!(
            CartError::from(BookError::NotFound("b".to_string())),
            CartError::BookNotFound(_)
        ));
    }
}
