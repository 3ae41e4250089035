pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use routes::{create_gateway_router, create_generator_router, create_retriever_router};
pub use state::{GatewayState, GeneratorState, RetrieverState};
