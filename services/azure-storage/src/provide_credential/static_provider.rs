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

use async_trait::async_trait;
use sassign_core::{Context, ProvideCredential, Result};

use crate::credential::BearerToken;

/// StaticCredentialProvider hands out a bearer token acquired elsewhere.
///
/// Once the token expires the provider keeps returning it, so requests made
/// with it fail until a new provider is installed.
#[derive(Clone, Debug)]
pub struct StaticCredentialProvider {
    token: BearerToken,
}

impl StaticCredentialProvider {
    /// Create a provider for the given token.
    pub fn new(token: BearerToken) -> Self {
        Self { token }
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = BearerToken;

    async fn provide_credential(&self, _ctx: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(self.token.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sassign_core::SigningCredential;

    #[tokio::test]
    async fn test_static_credential_provider() {
        let provider =
            StaticCredentialProvider::new(BearerToken::from_expires_in("token", "Bearer", 60));
        let token = provider
            .provide_credential(&Context::new())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(token.access_token, "token");
        assert!(token.is_valid());
    }
}
