pub mod routes;
pub mod seed;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use biblio_kernel::{settings::CatalogSettings, InitCtx, Module};

use store::{BookStore, InMemoryBookStore};

/// Catalog module: paginated reads and validated writes over the book store.
pub struct BooksModule {
    store: Arc<InMemoryBookStore>,
    page_size: u32,
    seed_demo_data: bool,
}

impl BooksModule {
    pub fn new(settings: &CatalogSettings) -> Self {
        Self {
            store: Arc::new(InMemoryBookStore::new()),
            page_size: settings.page_size,
            seed_demo_data: settings.seed_demo_data,
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if self.seed_demo_data {
            let seeded = self.store.seed(seed::demo_books()).await;
            tracing::info!(module = self.name(), seeded, "seeded demo catalog");
        }

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(Arc::clone(&self.store) as Arc<dyn BookStore>, self.page_size)
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List a page of books",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "page",
                                "in": "query",
                                "schema": { "type": "integer", "minimum": 1 },
                                "description": "Page number, defaults to 1"
                            },
                            {
                                "name": "limit",
                                "in": "query",
                                "schema": { "type": "integer", "minimum": 1 },
                                "description": "Records per page, defaults to the configured page size"
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "One page of the catalog with pagination metadata",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/PageResult" }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookPayload" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Created book including its assigned id",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "400": {
                                "description": "Validation failure with field-level detail",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    },
                    "put": {
                        "summary": "Update a book, replacing all fields",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Book" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Updated book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "400": {
                                "description": "Validation failure with field-level detail",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            },
                            "404": {
                                "description": "No book with the given id",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "id",
                                "in": "query",
                                "required": true,
                                "schema": { "type": "integer" }
                            }
                        ],
                        "responses": {
                            "204": { "description": "Book deleted" },
                            "404": {
                                "description": "No book with the given id",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "description": "Store-assigned identifier" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "genre": { "type": "string" },
                            "publishedYear": { "type": "integer", "minimum": 0 },
                            "status": { "type": "string" },
                            "image": { "type": "string", "format": "uri" }
                        },
                        "required": ["id", "title", "author", "genre", "publishedYear", "status", "image"]
                    },
                    "BookPayload": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "genre": { "type": "string" },
                            "publishedYear": { "type": "integer", "minimum": 0 },
                            "status": { "type": "string" },
                            "image": { "type": "string", "format": "uri" }
                        },
                        "required": ["title", "author", "genre", "publishedYear", "status", "image"]
                    },
                    "PageResult": {
                        "type": "object",
                        "properties": {
                            "books": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Book" }
                            },
                            "config": {
                                "type": "object",
                                "properties": {
                                    "total": { "type": "integer" },
                                    "totalPages": { "type": "integer" },
                                    "page": { "type": "integer" },
                                    "limit": { "type": "integer" }
                                },
                                "required": ["total", "totalPages", "page", "limit"]
                            }
                        },
                        "required": ["books", "config"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(settings: &CatalogSettings) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(settings))
}
