use std::collections::BTreeMap;

use crate::foundation::error::{RetouchError, RetouchResult};
use crate::ops::flip::{FLIP, FlipOperation, flip_shader};
use crate::ops::{OptionsMap, Operation};
use crate::render::shader::ShaderSource;

/// Builds an operation from its options and the shader program registered for it.
pub type OperationFactory =
    fn(&OptionsMap, Option<ShaderSource>) -> RetouchResult<Box<dyn Operation>>;

struct Entry {
    factory: OperationFactory,
    shader: Option<ShaderSource>,
}

/// Name-to-constructor table for operations, plus the shader program each one uses.
pub struct OperationRegistry {
    entries: BTreeMap<&'static str, Entry>,
}

impl OperationRegistry {
    /// Registry with no operations.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Registry with every built-in operation and its default shader program.
    pub fn with_builtins() -> Self {
        let mut reg = Self::empty();
        reg.register(FLIP, Some(flip_shader()), create_flip);
        reg
    }

    /// Add or replace an operation.
    pub fn register(
        &mut self,
        identifier: &'static str,
        shader: Option<ShaderSource>,
        factory: OperationFactory,
    ) {
        self.entries.insert(identifier, Entry { factory, shader });
    }

    /// Whether `identifier` is registered.
    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    /// Registered identifiers, sorted.
    pub fn identifiers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    /// Shader program currently registered for `identifier`.
    pub fn shader(&self, identifier: &str) -> Option<&ShaderSource> {
        self.entries.get(identifier).and_then(|e| e.shader.as_ref())
    }

    /// Replace the shader program used by operations created from now on.
    pub fn set_shader(&mut self, identifier: &str, source: ShaderSource) -> RetouchResult<()> {
        let entry = self
            .entries
            .get_mut(identifier)
            .ok_or_else(|| unknown_operation(identifier))?;
        entry.shader = Some(source);
        Ok(())
    }

    /// Remove the shader program for `identifier`, returning it.
    pub fn remove_shader(&mut self, identifier: &str) -> Option<ShaderSource> {
        self.entries.get_mut(identifier).and_then(|e| e.shader.take())
    }

    /// Construct the operation named `identifier`.
    pub fn create(
        &self,
        identifier: &str,
        options: &OptionsMap,
    ) -> RetouchResult<Box<dyn Operation>> {
        let entry = self
            .entries
            .get(identifier)
            .ok_or_else(|| unknown_operation(identifier))?;
        (entry.factory)(options, entry.shader.clone())
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationRegistry")
            .field("operations", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn create_flip(
    options: &OptionsMap,
    shader: Option<ShaderSource>,
) -> RetouchResult<Box<dyn Operation>> {
    Ok(Box::new(FlipOperation::from_options(options, shader)?))
}

fn unknown_operation(identifier: &str) -> RetouchError {
    RetouchError::validation(format!("unknown operation \"{identifier}\""))
}

#[cfg(test)]
#[path = "../../tests/unit/ops/registry.rs"]
mod tests;
