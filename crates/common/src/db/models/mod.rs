//! SeaORM entity models

mod reading;

pub use reading::{
    Entity as ReadingEntity,
    Model as Reading,
    ActiveModel as ReadingActiveModel,
    Column as ReadingColumn,
};
