use oauth2::TokenResponse;
use oauth2::basic::BasicTokenResponse;

#[derive(Clone, Debug)]
pub struct TokenInfo {
    pub access_token: String,
}

impl TokenInfo {
    pub fn from_token_response(response: BasicTokenResponse) -> TokenInfo {
        TokenInfo {
            access_token: response.access_token().secret().to_owned(),
        }
    }
}
