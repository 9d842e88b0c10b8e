//! YAML loading with `!include`, `!secret` and `!env_var` tags

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::value::TaggedValue;
use serde_yaml::{Mapping, Value};
use tracing::{debug, trace};

use crate::error::{ConfigError, ConfigResult};
use crate::secrets::Secrets;

/// Tags the loader resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    /// `!include file.yaml`, relative to the including file
    Include,
    /// `!secret key`, looked up in `secrets.yaml`
    Secret,
    /// `!env_var NAME`
    EnvVar,
}

impl Tag {
    fn parse(tag: &str) -> Option<Self> {
        match tag {
            "!include" => Some(Tag::Include),
            "!secret" => Some(Tag::Secret),
            "!env_var" => Some(Tag::EnvVar),
            _ => None,
        }
    }
}

/// Loads YAML documents and resolves custom tags
pub struct YamlLoader {
    secrets: Secrets,
    /// Files currently being loaded, outermost first
    stack: Vec<PathBuf>,
}

impl YamlLoader {
    /// Create a loader using the secrets file in `config_dir`
    pub fn new(config_dir: &Path) -> ConfigResult<Self> {
        Ok(Self::with_secrets(Secrets::load(config_dir)?))
    }

    pub fn with_secrets(secrets: Secrets) -> Self {
        Self {
            secrets,
            stack: Vec::new(),
        }
    }

    /// Load a file and resolve every tag in it
    pub fn load_file(&mut self, path: &Path) -> ConfigResult<Value> {
        if self.stack.iter().any(|p| p == path) {
            return Err(ConfigError::CircularInclude {
                path: path.to_path_buf(),
            });
        }
        debug!(path = %path.display(), "Loading YAML");

        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let document: Value =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::ParseYaml {
                path: path.to_path_buf(),
                source,
            })?;

        self.stack.push(path.to_path_buf());
        let resolved = self.resolve(document, path);
        self.stack.pop();
        resolved
    }

    fn resolve(&mut self, value: Value, file: &Path) -> ConfigResult<Value> {
        match value {
            Value::Tagged(tagged) => self.resolve_tagged(*tagged, file),
            Value::Sequence(items) => items
                .into_iter()
                .map(|item| self.resolve(item, file))
                .collect::<ConfigResult<Vec<_>>>()
                .map(Value::Sequence),
            Value::Mapping(entries) => {
                let mut resolved = Mapping::with_capacity(entries.len());
                for (key, value) in entries {
                    resolved.insert(key, self.resolve(value, file)?);
                }
                Ok(Value::Mapping(resolved))
            }
            other => Ok(other),
        }
    }

    fn resolve_tagged(&mut self, tagged: TaggedValue, file: &Path) -> ConfigResult<Value> {
        let name = tagged.tag.to_string();
        let Some(tag) = Tag::parse(&name) else {
            // Left for the deserializer to reject or accept
            let value = self.resolve(tagged.value, file)?;
            return Ok(Value::Tagged(Box::new(TaggedValue {
                tag: tagged.tag,
                value,
            })));
        };

        let Value::String(argument) = tagged.value else {
            return Err(ConfigError::TagArgument {
                tag: name,
                path: file.to_path_buf(),
            });
        };
        trace!(%name, %argument, "Resolving tag");

        match tag {
            Tag::Include => {
                let base = file.parent().unwrap_or_else(|| Path::new("."));
                self.load_file(&base.join(argument))
            }
            Tag::Secret => self.secrets.get(&argument).cloned(),
            Tag::EnvVar => std::env::var(&argument)
                .map(Value::String)
                .map_err(|_| ConfigError::EnvVarNotFound { var: argument }),
        }
    }
}

/// Load `file` from `config_dir` with tag resolution
pub fn load_yaml(config_dir: &Path, file: impl AsRef<Path>) -> ConfigResult<Value> {
    YamlLoader::new(config_dir)?.load_file(&config_dir.join(file))
}
