use crate::{
    error::ServiceError,
    spotify::AuthorizedClient,
    types::{CurrentUserResponse, UserProfile},
};

/// Fetches the profile of the token's owner.
///
/// The `email` and `product` fields depend on the granted scope; the premium
/// flag is derived here so the frontend does not have to compare product
/// strings.
pub async fn current_user(client: &AuthorizedClient<'_>) -> Result<UserProfile, ServiceError> {
    let profile: CurrentUserResponse = client.get_json("/me", &[]).await?;

    Ok(UserProfile {
        is_premium: profile.product.as_deref() == Some("premium"),
        id: profile.id,
        display_name: profile.display_name,
        email: profile.email,
        product: profile.product,
    })
}
