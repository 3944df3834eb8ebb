//! DTO Module
//!
//! Input schemas and output payloads for every REST operation

pub mod auth;
pub mod member;
pub mod shop_list;
pub mod user;

use std::collections::BTreeMap;
use thiserror::Error;

use crate::engine::validation::FieldSchema;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DtoError {
    #[error("Unknown DTO: {0}")]
    Unknown(String),
}

/// Where a schema's input comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtoSource {
    Body,
    Query,
}

#[derive(Debug, Clone)]
pub struct DtoEntry {
    pub source: DtoSource,
    pub schema: FieldSchema,
}

/// Named DTO-in schemas, built once at startup
#[derive(Debug, Clone)]
pub struct DtoRegistry {
    dtos: BTreeMap<&'static str, DtoEntry>,
}

impl DtoRegistry {
    pub fn standard() -> Self {
        use DtoSource::{Body, Query};

        let entries = [
            ("register", Body, auth::register_dto_in()),
            ("login", Body, auth::login_dto_in()),
            ("getUsers", Query, user::get_users_dto_in()),
            ("updateUser", Body, user::update_user_dto_in()),
            ("getShopLists", Query, shop_list::get_shop_lists_dto_in()),
            ("createShopList", Body, shop_list::create_shop_list_dto_in()),
            ("updateShopList", Body, shop_list::update_shop_list_dto_in()),
            ("addItem", Body, shop_list::add_item_dto_in()),
            ("updateItem", Body, shop_list::update_item_dto_in()),
            ("addMember", Body, member::add_member_dto_in()),
            ("updateMemberRole", Body, member::update_member_role_dto_in()),
        ];

        let dtos = entries
            .into_iter()
            .map(|(name, source, schema)| (name, DtoEntry { source, schema }))
            .collect();
        Self { dtos }
    }

    pub fn get(&self, name: &str) -> Result<&DtoEntry, DtoError> {
        self.dtos
            .get(name)
            .ok_or_else(|| DtoError::Unknown(name.to_string()))
    }

    pub fn schema(&self, name: &str) -> Result<&FieldSchema, DtoError> {
        self.get(name).map(|entry| &entry.schema)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.dtos.keys().copied()
    }
}

impl Default for DtoRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
