//! .npmrc auth content for staged workspaces

use crate::domain::Credential;
use crate::registry::strip_scheme;
use base64::Engine;

/// Builds the .npmrc written to the staged workspace root: a registry
/// override when one credential replaces the default, then one auth line
/// per credential carrying a token
pub fn npmrc_content(credentials: &[Credential]) -> String {
    let mut lines: Vec<String> = Vec::new();

    for credential in credentials {
        if let Credential::NpmRegistry {
            registry,
            replaces_base: true,
            ..
        } = credential
        {
            lines.push(format!("registry = https://{}", strip_scheme(registry)));
        }
    }

    for credential in credentials {
        if let Credential::NpmRegistry {
            registry,
            token: Some(token),
            ..
        } = credential
        {
            lines.push(auth_line(strip_scheme(registry), token));
        }
    }

    if lines.is_empty() {
        String::new()
    } else {
        lines.join("\n") + "\n"
    }
}

/// npm expects `_auth` for basic credentials and `_authToken` for bearer
/// tokens; tokens holding `user:password` are encoded, tokens that already
/// decode to one are passed through
fn auth_line(registry: &str, token: &str) -> String {
    if token.contains(':') {
        let encoded = base64::engine::general_purpose::STANDARD.encode(token.as_bytes());
        format!("//{}/:_auth={}", registry, encoded)
    } else if decodes_to_basic_credentials(token) {
        format!("//{}/:_auth={}", registry, token)
    } else {
        format!("//{}/:_authToken={}", registry, token)
    }
}

fn decodes_to_basic_credentials(token: &str) -> bool {
    let Ok(decoded) = base64::engine::general_purpose::STANDARD.decode(token) else {
        return false;
    };
    match String::from_utf8(decoded) {
        Ok(decoded) => decoded.is_ascii() && decoded.contains(':'),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_credentials() {
        assert_eq!(npmrc_content(&[]), "");
    }

    #[test]
    fn test_bearer_token_line() {
        let credentials = vec![Credential::npm_registry(
            "npm.fury.io/acme",
            Some("secret-token".to_string()),
        )];
        assert_eq!(
            npmrc_content(&credentials),
            "//npm.fury.io/acme/:_authToken=secret-token\n"
        );
    }

    #[test]
    fn test_basic_credentials_encoded() {
        let credentials = vec![Credential::npm_registry(
            "registry.corp.example.com",
            Some("user:password".to_string()),
        )];
        let encoded = base64::engine::general_purpose::STANDARD.encode("user:password");
        assert_eq!(
            npmrc_content(&credentials),
            format!("//registry.corp.example.com/:_auth={}\n", encoded)
        );
    }

    #[test]
    fn test_already_encoded_credentials_pass_through() {
        let encoded = base64::engine::general_purpose::STANDARD.encode("user:password");
        let credentials = vec![Credential::npm_registry(
            "registry.corp.example.com",
            Some(encoded.clone()),
        )];
        assert_eq!(
            npmrc_content(&credentials),
            format!("//registry.corp.example.com/:_auth={}\n", encoded)
        );
    }

    #[test]
    fn test_replaces_base_registry_line_first() {
        let credentials = vec![
            Credential::npm_registry("npm.fury.io/acme", Some("token-a".to_string())),
            Credential::npm_registry("https://registry.corp.example.com", Some("token-b".to_string()))
                .replacing_base(),
        ];
        assert_eq!(
            npmrc_content(&credentials),
            "registry = https://registry.corp.example.com\n\
             //npm.fury.io/acme/:_authToken=token-a\n\
             //registry.corp.example.com/:_authToken=token-b\n"
        );
    }

    #[test]
    fn test_git_credentials_ignored() {
        let credentials = vec![Credential::git_source("github.com", "user", "pass")];
        assert_eq!(npmrc_content(&credentials), "");
    }

    #[test]
    fn test_tokenless_registry_without_replaces_base_emits_nothing() {
        let credentials = vec![Credential::npm_registry("npm.fury.io/acme", None)];
        assert_eq!(npmrc_content(&credentials), "");
    }
}
