//! Form storage.
//!
//! The grading engine only ever reads a form; these stores supply the
//! form-by-id boundary plus the create/update path with validation.
//! `MemoryStore` backs tests and embedding, `DirStore` keeps one JSON
//! document per form on disk.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use crate::error::FormError;
use crate::model::Form;
use crate::parser::form_from_json;
use crate::validate::validate_form;

/// Storage boundary for form documents.
pub trait FormStore: Send + Sync {
    /// All forms, newest first.
    fn list(&self) -> Result<Vec<Form>, FormError>;

    /// The form with the given id.
    fn get(&self, id: Uuid) -> Result<Form, FormError>;

    /// Validate and persist a new form. Assigns an id when the form
    /// carries a nil one, and stamps both timestamps.
    fn insert(&self, form: Form) -> Result<Form, FormError>;

    /// Validate and replace the form with the given id, preserving its
    /// creation time and bumping `updated_at`.
    fn update(&self, id: Uuid, form: Form) -> Result<Form, FormError>;

    /// Remove the form with the given id.
    fn delete(&self, id: Uuid) -> Result<(), FormError>;
}

fn prepare_insert(mut form: Form) -> Result<Form, FormError> {
    validate_form(&form)?;
    if form.id.is_nil() {
        form.id = Uuid::new_v4();
    }
    let now = Utc::now();
    form.created_at = now;
    form.updated_at = now;
    Ok(form)
}

/// In-memory store.
#[derive(Default)]
pub struct MemoryStore {
    forms: Mutex<HashMap<Uuid, Form>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Form>> {
        self.forms.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl FormStore for MemoryStore {
    fn list(&self) -> Result<Vec<Form>, FormError> {
        let mut forms: Vec<Form> = self.lock().values().cloned().collect();
        forms.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(forms)
    }

    fn get(&self, id: Uuid) -> Result<Form, FormError> {
        self.lock().get(&id).cloned().ok_or(FormError::NotFound(id))
    }

    fn insert(&self, form: Form) -> Result<Form, FormError> {
        let form = prepare_insert(form)?;
        self.lock().insert(form.id, form.clone());
        Ok(form)
    }

    fn update(&self, id: Uuid, mut form: Form) -> Result<Form, FormError> {
        validate_form(&form)?;
        let mut forms = self.lock();
        let existing = forms.get(&id).ok_or(FormError::NotFound(id))?;
        form.id = id;
        form.created_at = existing.created_at;
        form.updated_at = Utc::now();
        forms.insert(id, form.clone());
        Ok(form)
    }

    fn delete(&self, id: Uuid) -> Result<(), FormError> {
        self.lock()
            .remove(&id)
            .map(|_| ())
            .ok_or(FormError::NotFound(id))
    }
}

/// Directory-backed store: one pretty-printed JSON document per form,
/// named by id.
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: PathBuf) -> Self {
        DirStore { root }
    }

    fn path_for(&self, id: Uuid) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    fn write_form(&self, form: &Form) -> Result<(), FormError> {
        std::fs::create_dir_all(&self.root).map_err(|e| FormError::Storage(e.to_string()))?;
        let json = serde_json::to_string_pretty(form)
            .map_err(|e| FormError::Storage(e.to_string()))?;
        std::fs::write(self.path_for(form.id), json)
            .map_err(|e| FormError::Storage(e.to_string()))
    }

    fn read_form(&self, id: Uuid) -> Result<Form, FormError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(FormError::NotFound(id));
        }
        let content =
            std::fs::read_to_string(&path).map_err(|e| FormError::Storage(e.to_string()))?;
        form_from_json(&content)
    }
}

impl FormStore for DirStore {
    fn list(&self) -> Result<Vec<Form>, FormError> {
        let mut forms = Vec::new();
        if !self.root.exists() {
            return Ok(forms);
        }
        let entries =
            std::fs::read_dir(&self.root).map_err(|e| FormError::Storage(e.to_string()))?;
        for entry in entries {
            let entry = entry.map_err(|e| FormError::Storage(e.to_string()))?;
            let path = entry.path();
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let Ok(id) = stem.parse::<Uuid>() else {
                continue;
            };
            match self.read_form(id) {
                Ok(form) => forms.push(form),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
        forms.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(forms)
    }

    fn get(&self, id: Uuid) -> Result<Form, FormError> {
        self.read_form(id)
    }

    fn insert(&self, form: Form) -> Result<Form, FormError> {
        let form = prepare_insert(form)?;
        self.write_form(&form)?;
        Ok(form)
    }

    fn update(&self, id: Uuid, mut form: Form) -> Result<Form, FormError> {
        validate_form(&form)?;
        let existing = self.read_form(id)?;
        form.id = id;
        form.created_at = existing.created_at;
        form.updated_at = Utc::now();
        self.write_form(&form)?;
        Ok(form)
    }

    fn delete(&self, id: Uuid) -> Result<(), FormError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(FormError::NotFound(id));
        }
        std::fs::remove_file(path).map_err(|e| FormError::Storage(e.to_string()))
    }
}
