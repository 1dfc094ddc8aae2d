pub mod account;
pub mod book;
pub mod cart;

pub use account::PostgresAccountRepository;
pub use book::PostgresBookRepository;
pub use cart::PostgresCartRepository;
