//! OpenAPI document for the REST API

use utoipa::OpenApi;

use super::{auth, members, shop_lists, system, users};
use crate::engine::dto::auth::{AuthDtoOut, AuthUser, CurrentUser, GetMeDtoOut};
use crate::engine::dto::member::{GetMembersDtoOut, MemberDtoOut};
use crate::engine::dto::shop_list::{
    DeletedDtoOut, GetShopListsDtoOut, ShopListDtoOut, ShopListItem,
};
use crate::engine::dto::user::{GetUsersDtoOut, UserDtoOut, UserSummary};
use crate::engine::rbac::MembershipRole;
use crate::engine::response::{Envelope, ErrorEntry};
use crate::engine::validation::FieldError;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "shoplist",
        description = "Shared shopping list REST API"
    ),
    paths(
        system::health_check,
        auth::register,
        auth::login,
        auth::get_me,
        users::get_users,
        users::get_user,
        users::update_user,
        shop_lists::get_shop_lists,
        shop_lists::create_shop_list,
        shop_lists::get_shop_list,
        shop_lists::update_shop_list,
        shop_lists::delete_shop_list,
        shop_lists::add_item,
        shop_lists::update_item,
        shop_lists::delete_item,
        members::get_members,
        members::add_member,
        members::update_member_role,
        members::remove_member,
    ),
    components(schemas(
        Envelope,
        ErrorEntry,
        FieldError,
        system::HealthResponse,
        AuthDtoOut,
        AuthUser,
        CurrentUser,
        GetMeDtoOut,
        UserSummary,
        GetUsersDtoOut,
        UserDtoOut,
        ShopListItem,
        ShopListDtoOut,
        GetShopListsDtoOut,
        DeletedDtoOut,
        MemberDtoOut,
        GetMembersDtoOut,
        MembershipRole,
    )),
    tags(
        (name = "system", description = "Health and discovery"),
        (name = "auth", description = "Registration and sessions"),
        (name = "users", description = "User profiles"),
        (name = "shoplists", description = "Shop lists"),
        (name = "items", description = "Items on a shop list"),
        (name = "members", description = "Shop list membership"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/api/health",
            "/api/auth/register",
            "/api/auth/login",
            "/api/auth/me",
            "/api/users",
            "/api/users/{id}",
            "/api/shoplists",
            "/api/shoplists/{id}",
            "/api/shoplists/{id}/items",
            "/api/shoplists/{id}/items/{item_index}",
            "/api/shoplists/{id}/members",
            "/api/shoplists/{id}/members/{user_id}",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }
}
