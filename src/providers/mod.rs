pub mod hacienda;

pub use hacienda::HaciendaProvider;
