pub mod credentials;
pub mod models;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use shelf_db::UserStore;
use shelf_kernel::{InitCtx, Module};

use credentials::PasswordVerifier;
use routes::UsersState;

/// Login and security-question verification. Mounted at `/api` because its
/// routes span `/api/login` and `/api/users/...`.
pub struct UsersModule {
    state: UsersState,
}

impl UsersModule {
    pub fn new(
        users: Arc<dyn UserStore>,
        verifier: PasswordVerifier,
        security_question_count: usize,
    ) -> Self {
        Self {
            state: UsersState {
                users,
                verifier: Arc::new(verifier),
                security_question_count,
            },
        }
    }
}

#[async_trait]
impl Module for UsersModule {
    fn name(&self) -> &'static str {
        "users"
    }

    fn mount_path(&self) -> String {
        "/api".to_string()
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            security_questions = self.state.security_question_count,
            "users module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let message = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/Message" }
                    }
                }
            })
        };

        Some(json!({
            "paths": {
                "/login": {
                    "post": {
                        "summary": "Check an email and password",
                        "tags": ["Users"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/LoginRequest" }
                                }
                            }
                        },
                        "responses": {
                            "200": message("Authentication successful"),
                            "400": error("Bad Request"),
                            "401": error("Unauthorized")
                        }
                    }
                },
                "/users/{email}/verify-security-questions": {
                    "post": {
                        "summary": "Verify security question answers",
                        "tags": ["Users"],
                        "parameters": [{
                            "name": "email",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "string", "format": "email" }
                        }],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/SecurityAnswers" }
                                }
                            }
                        },
                        "responses": {
                            "200": message("Security questions successfully answered"),
                            "400": error("Bad Request"),
                            "401": error("Unauthorized")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "LoginRequest": {
                        "type": "object",
                        "properties": {
                            "email": { "type": "string", "format": "email" },
                            "password": { "type": "string" }
                        },
                        "required": ["email", "password"]
                    },
                    "SecurityAnswers": {
                        "type": "object",
                        "properties": {
                            "email": {
                                "type": "string",
                                "format": "email",
                                "description": "Optional. The path email identifies the user; a body email must equal it"
                            },
                            "answers": {
                                "type": "array",
                                "minItems": self.state.security_question_count,
                                "maxItems": self.state.security_question_count,
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "answer": { "type": "string" }
                                    },
                                    "required": ["answer"],
                                    "additionalProperties": false
                                }
                            }
                        },
                        "required": ["answers"],
                        "additionalProperties": false
                    },
                    "Message": {
                        "type": "object",
                        "properties": {
                            "message": { "type": "string" }
                        },
                        "required": ["message"]
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "users module stopped");
        Ok(())
    }
}

/// Create a new instance of the users module
pub fn create_module(
    users: Arc<dyn UserStore>,
    verifier: PasswordVerifier,
    security_question_count: usize,
) -> Arc<dyn Module> {
    Arc::new(UsersModule::new(users, verifier, security_question_count))
}
