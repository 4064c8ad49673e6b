//! Business logic services for the application layer.

pub mod code_allocator;
pub mod link_service;
pub mod redirect_dispatcher;

pub use code_allocator::CodeAllocator;
pub use link_service::{LinkPage, LinkService};
pub use redirect_dispatcher::RedirectDispatcher;
