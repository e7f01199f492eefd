pub mod container;
pub mod data;
pub mod ssr;
pub mod view;
