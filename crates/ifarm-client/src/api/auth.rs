//! Authentication endpoints.

use serde::{Deserialize, Serialize};

use ifarm_core::auth::{UserInfo, UserInfoPatch};

use crate::request::RequestDescriptor;

/// Credentials for `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /auth/refresh`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Token pair plus profile returned by login and refresh.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub access_token: String,
    pub refresh_token: String,
    pub user_info: UserInfo,
}

pub fn login(request: &LoginRequest) -> RequestDescriptor {
    RequestDescriptor::post("/auth/login").with_body(request)
}

pub fn refresh(request: &RefreshRequest) -> RequestDescriptor {
    RequestDescriptor::post("/auth/refresh").with_body(request)
}

pub fn logout() -> RequestDescriptor {
    RequestDescriptor::post("/auth/logout")
}

pub fn profile() -> RequestDescriptor {
    RequestDescriptor::get("/auth/profile")
}

pub fn update_profile(patch: &UserInfoPatch) -> RequestDescriptor {
    RequestDescriptor::put("/auth/profile").with_body(patch)
}
