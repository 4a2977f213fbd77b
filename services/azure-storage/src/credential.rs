// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use chrono::TimeDelta;
use sassign_core::time::{now, DateTime};
use sassign_core::utils::Redact;
use sassign_core::SigningCredential;
use std::fmt::{Debug, Formatter};

/// BearerToken is an OAuth2 access token issued by Azure AD for the storage scope.
#[derive(Clone)]
pub struct BearerToken {
    /// The opaque access token.
    pub access_token: String,
    /// Token type returned by the endpoint, normally `Bearer`.
    pub token_type: String,
    /// The absolute instant after which the token must not be used.
    pub expires_at: DateTime,
}

impl Debug for BearerToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerToken")
            .field("access_token", &Redact::from(&self.access_token))
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl SigningCredential for BearerToken {
    fn is_valid(&self) -> bool {
        !self.access_token.is_empty() && self.expires_at > now()
    }
}

impl BearerToken {
    /// Create a token from its parts.
    pub fn new(
        access_token: impl Into<String>,
        token_type: impl Into<String>,
        expires_at: DateTime,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: token_type.into(),
            expires_at,
        }
    }

    /// Create a token that expires `expires_in` seconds after now.
    ///
    /// The relative lifetime from the token endpoint is turned into an
    /// absolute instant at the moment the response is received.
    pub fn from_expires_in(
        access_token: impl Into<String>,
        token_type: impl Into<String>,
        expires_in: i64,
    ) -> Self {
        let lifetime = TimeDelta::try_seconds(expires_in).unwrap_or(TimeDelta::zero());
        Self::new(access_token, token_type, now() + lifetime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_validity() {
        let token = BearerToken::from_expires_in("token", "Bearer", 3600);
        assert!(token.is_valid());

        let expired = BearerToken::new("token", "Bearer", now() - TimeDelta::seconds(1));
        assert!(!expired.is_valid());

        let empty = BearerToken::from_expires_in("", "Bearer", 3600);
        assert!(!empty.is_valid());
    }

    #[test]
    fn test_zero_lifetime_is_invalid() {
        let token = BearerToken::from_expires_in("token", "Bearer", 0);
        assert!(!token.is_valid());
    }

    #[test]
    fn test_debug_redacts_token() {
        let token = BearerToken::from_expires_in("eyJ0eXAiOiJKV1QiLCJhbGciOi", "Bearer", 3600);
        let output = format!("{token:?}");
        assert!(output.contains("eyJ***iOi"));
        assert!(!output.contains("eyJ0eXAiOiJKV1QiLCJhbGciOi"));
    }
}
