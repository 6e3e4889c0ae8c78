use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::genres;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "venues")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    /// JSON-encoded list, see [`Model::genre_list`]
    #[sea_orm(column_type = "Text")]
    pub genres: String,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl Model {
    pub fn genre_list(&self) -> Vec<String> {
        genres::decode(&self.genres)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::show::Entity")]
    Shows,
}

impl Related<super::show::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shows.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
