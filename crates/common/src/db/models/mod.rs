//! SeaORM entity models

mod article;
mod user;

pub use article::{
    Entity as ArticleEntity,
    Model as Article,
    ActiveModel as ArticleActiveModel,
    Column as ArticleColumn,
};

pub use user::{
    Entity as UserEntity,
    Model as User,
    ActiveModel as UserActiveModel,
    Column as UserColumn,
};
