//! Records exchanged with the platform API, plus the paging envelope the
//! list endpoints return.

pub mod auth;
pub mod errors;
pub mod id;
pub mod ingredient;
pub mod news;
pub mod notification;
pub mod page;
pub mod profile;
pub mod recipe;
pub mod user;

pub use auth::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, ResetPasswordRequest,
};
pub use errors::ErrorResponse;
pub use ingredient::Ingredient;
pub use news::{News, NewsDraft};
pub use notification::{Notification, NotificationDraft};
pub use page::{ListPayload, ListQuery, Page};
pub use profile::{ProfileDraft, UserProfile};
pub use recipe::{Recipe, RecipeDraft, RecipeIngredient};
pub use user::{Role, User, UserDraft};
