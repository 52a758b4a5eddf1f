use std::collections::HashMap;
use std::sync::{Arc, Weak};

use audio_backend::{BackendError, BusId};
use tracing::{debug, info, warn};

use crate::config::{AudioConfig, BusConfig};
use crate::context::AudioContext;
use crate::AudioError;

/// Volume of the anonymous bus handed out when no named bus applies.
pub const ANONYMOUS_BUS_VOLUME: f32 = 1.0;

/// A named mixing node. Parents are held weakly; the registry owns every bus.
#[derive(Debug)]
pub struct Bus {
    name: String,
    id: BusId,
    parent: Option<Weak<Bus>>,
    default_volume: f32,
}

impl Bus {
    /// Empty for the anonymous fallback bus.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> BusId {
        self.id
    }

    pub fn parent(&self) -> Option<Arc<Bus>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn default_volume(&self) -> f32 {
        self.default_volume
    }

    /// Number of ancestors.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cur = self.parent();
        while let Some(bus) = cur {
            depth += 1;
            cur = bus.parent();
        }
        depth
    }

    /// `Master/Sfx/Ui` style path from the root down to this bus.
    pub fn path(&self) -> String {
        let mut names = vec![self.name.clone()];
        let mut cur = self.parent();
        while let Some(bus) = cur {
            names.push(bus.name.clone());
            cur = bus.parent();
        }
        names.reverse();
        names.join("/")
    }
}

/// Named buses built from config, plus the anonymous fallback bus.
#[derive(Debug)]
pub struct BusRegistry {
    by_name: HashMap<String, Arc<Bus>>,
    // Everything ever created, in declaration order. Shadowed duplicates stay
    // here so children created under them keep a live parent.
    created: Vec<Arc<Bus>>,
    fallback: Arc<Bus>,
}

impl BusRegistry {
    pub fn build(ctx: &AudioContext, config: &AudioConfig) -> Result<Self, AudioError> {
        Self::build_from(ctx, &config.buses, &config.default_bus)
    }

    /// Create every bus in `entries` in order. A parent must already exist when
    /// its child is declared. A later entry with a name already in use
    /// replaces the earlier one for lookups.
    pub fn build_from(
        ctx: &AudioContext,
        entries: &[BusConfig],
        default_bus: &str,
    ) -> Result<Self, AudioError> {
        let anonymous = Arc::new(create_bus(ctx, "", None, ANONYMOUS_BUS_VOLUME)?);
        let mut by_name: HashMap<String, Arc<Bus>> = HashMap::new();
        let mut created = Vec::with_capacity(entries.len());

        for entry in entries {
            let parent = if entry.parent.is_empty() {
                None
            } else {
                let parent =
                    by_name.get(&entry.parent).cloned().ok_or_else(|| AudioError::UnknownParentBus {
                        bus: entry.name.clone(),
                        parent: entry.parent.clone(),
                    })?;
                Some(parent)
            };
            let bus =
                Arc::new(create_bus(ctx, &entry.name, parent.as_ref(), entry.default_volume)?);
            debug!(
                bus = %entry.name,
                parent = %entry.parent,
                volume = entry.default_volume,
                "bus created"
            );
            if by_name.insert(entry.name.clone(), bus.clone()).is_some() {
                warn!(bus = %entry.name, "bus declared twice; the later declaration wins");
            }
            created.push(bus);
        }

        let fallback = if default_bus.is_empty() {
            anonymous
        } else if let Some(bus) = by_name.get(default_bus) {
            bus.clone()
        } else {
            warn!(bus = %default_bus, "default bus is not declared; using the anonymous bus");
            anonymous
        };

        info!(buses = by_name.len(), default = %fallback.name(), "bus registry built");
        Ok(Self { by_name, created, fallback })
    }

    pub fn get(&self, name: &str) -> Option<Arc<Bus>> {
        self.by_name.get(name).cloned()
    }

    /// Named bus, or the fallback bus (with a warning) for an unknown name.
    pub fn get_or_fallback(&self, name: &str) -> Arc<Bus> {
        match self.by_name.get(name) {
            Some(bus) => bus.clone(),
            None => {
                warn!(bus = %name, "unknown bus; using the default bus");
                self.fallback.clone()
            }
        }
    }

    /// `None` means "no bus" and stays `None`; a name resolves through
    /// [`Self::get_or_fallback`].
    pub fn resolve(&self, name: Option<&str>) -> Option<Arc<Bus>> {
        name.map(|n| self.get_or_fallback(n))
    }

    pub fn fallback(&self) -> &Arc<Bus> {
        &self.fallback
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Named buses reachable by lookup, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Bus>> + '_ {
        self.created.iter().filter(|bus| {
            self.by_name
                .get(bus.name())
                .is_some_and(|canonical| Arc::ptr_eq(canonical, bus))
        })
    }

    pub fn roots(&self) -> impl Iterator<Item = &Arc<Bus>> + '_ {
        self.iter().filter(|bus| bus.is_root())
    }

    pub fn children_of<'a>(&'a self, parent: &'a Bus) -> impl Iterator<Item = &'a Arc<Bus>> + 'a {
        self.iter().filter(move |bus| {
            bus.parent
                .as_ref()
                .is_some_and(|p| std::ptr::eq(p.as_ptr(), parent))
        })
    }
}

fn create_bus(
    ctx: &AudioContext,
    name: &str,
    parent: Option<&Arc<Bus>>,
    volume: f32,
) -> Result<Bus, BackendError> {
    let id = ctx.with(|backend| {
        let id = backend.create_bus(name, parent.map(|p| p.id))?;
        backend.set_bus_volume(id, volume);
        Ok::<_, BackendError>(id)
    })?;
    Ok(Bus {
        name: name.to_string(),
        id,
        parent: parent.map(Arc::downgrade),
        default_volume: volume,
    })
}
