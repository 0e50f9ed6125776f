pub mod bom_explosion;
pub mod requisition;
