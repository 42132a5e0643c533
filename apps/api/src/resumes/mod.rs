// Resume creation and CRUD: request shapes, mappers, aggregate builder,
// service orchestration and the HTTP handlers on top of it.

pub mod builder;
pub mod dto;
pub mod handlers;
pub mod mappers;
pub mod service;
