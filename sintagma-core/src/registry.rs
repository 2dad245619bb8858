//! # Registro de Modelos com Carregamento Coalescido
//!
//! Os modelos de chunking são caros de carregar e imutáveis depois de
//! carregados. O registro os mantém em cache por chave (caminho ou nome de
//! recurso) e garante a disciplina *singleflight*: se N threads pedirem a
//! mesma chave ainda não carregada, a função de carga roda **exatamente uma
//! vez** e todas recebem o mesmo `Arc` do modelo.
//!
//! Falhas de carga não são memorizadas: o erro é propagado a todos que
//! aguardavam naquele momento e a chave volta a ficar vazia, permitindo que
//! uma chamada posterior tente de novo (falhas transitórias são recuperáveis).
//!
//! O registro é um objeto explícito de vida do processo, de propriedade da
//! camada que o constrói — sem singleton global mutável.

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::error::ChunkerError;
use crate::model::ChunkerModel;

/// Estado de um slot de carregamento
enum SlotState {
    /// O líder está executando o loader; os demais aguardam no condvar.
    Loading,
    /// Modelo pronto, compartilhado por todos os chamadores.
    Ready(Arc<ChunkerModel>),
    /// O loader falhou. O slot já foi removido do mapa; quem ainda segura
    /// este `Arc<Slot>` recebe o erro, novos chamadores recomeçam do zero.
    Failed(ChunkerError),
}

/// Um slot por chave: estado protegido por mutex + condvar para os que esperam
struct Slot {
    state: Mutex<SlotState>,
    ready: Condvar,
}

impl Slot {
    fn new() -> Self {
        Self {
            state: Mutex::new(SlotState::Loading),
            ready: Condvar::new(),
        }
    }
}

/// Cache de modelos carregados sob demanda, com coalescência de cargas
/// concorrentes.
///
/// # Exemplo
/// ```rust
/// use sintagma_core::{ModelRegistry, ChunkerModel};
///
/// let registry = ModelRegistry::new();
/// let model = registry
///     .get_or_load("padrao", |_| Ok(ChunkerModel::build()))
///     .unwrap();
/// assert!(registry.contains("padrao"));
/// drop(model);
/// ```
pub struct ModelRegistry {
    slots: Mutex<HashMap<String, Arc<Slot>>>,
}

impl ModelRegistry {
    /// Cria um registro vazio.
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Retorna o modelo em cache para `key`, ou executa `loader` para
    /// carregá-lo — exatamente uma vez, mesmo sob concorrência.
    ///
    /// O primeiro chamador de uma chave vazia vira o "líder" e roda o
    /// `loader` fora de qualquer lock do mapa (cargas de chaves diferentes
    /// prosseguem em paralelo). Os demais bloqueiam até o resultado:
    /// - `Ok(model)`: todos recebem clones do mesmo `Arc`.
    /// - `Err(e)`: todos os que aguardavam recebem o erro; a chave fica
    ///   vazia e pode ser tentada de novo.
    pub fn get_or_load<F>(&self, key: &str, loader: F) -> Result<Arc<ChunkerModel>, ChunkerError>
    where
        F: FnOnce(&str) -> Result<ChunkerModel, ChunkerError>,
    {
        self.get_or_load_inner(key, loader, None)
    }

    /// Como [`get_or_load`](Self::get_or_load), mas um chamador que espera
    /// mais que `timeout` falha sozinho com [`ChunkerError::ModelLoadTimeout`],
    /// sem afetar o líder nem os outros que aguardam.
    pub fn get_or_load_timeout<F>(
        &self,
        key: &str,
        loader: F,
        timeout: Duration,
    ) -> Result<Arc<ChunkerModel>, ChunkerError>
    where
        F: FnOnce(&str) -> Result<ChunkerModel, ChunkerError>,
    {
        self.get_or_load_inner(key, loader, Some(timeout))
    }

    fn get_or_load_inner<F>(
        &self,
        key: &str,
        loader: F,
        timeout: Option<Duration>,
    ) -> Result<Arc<ChunkerModel>, ChunkerError>
    where
        F: FnOnce(&str) -> Result<ChunkerModel, ChunkerError>,
    {
        // Fase 1: sob o lock do mapa, acha o slot da chave ou vira o líder
        let (slot, leader) = {
            let mut slots = self.slots.lock().expect("registry mutex poisoned");
            match slots.get(key) {
                Some(existing) => (Arc::clone(existing), false),
                None => {
                    let fresh = Arc::new(Slot::new());
                    slots.insert(key.to_string(), Arc::clone(&fresh));
                    (fresh, true)
                }
            }
        };

        if leader {
            // Fase 2 (líder): roda o loader sem segurar lock nenhum
            let result = loader(key);
            let outcome = match result {
                Ok(model) => {
                    let model = Arc::new(model);
                    let mut state = slot.state.lock().expect("slot mutex poisoned");
                    *state = SlotState::Ready(Arc::clone(&model));
                    slot.ready.notify_all();
                    Ok(model)
                }
                Err(e) => {
                    {
                        let mut state = slot.state.lock().expect("slot mutex poisoned");
                        *state = SlotState::Failed(e.clone());
                        slot.ready.notify_all();
                    }
                    // Remove a chave para que uma chamada futura possa tentar
                    // de novo. Só remove se ainda aponta para ESTE slot (um
                    // evict concorrente pode ter trocado o mapa).
                    let mut slots = self.slots.lock().expect("registry mutex poisoned");
                    if let Some(current) = slots.get(key) {
                        if Arc::ptr_eq(current, &slot) {
                            slots.remove(key);
                        }
                    }
                    Err(e)
                }
            };
            return outcome;
        }

        // Fase 2 (seguidor): espera o líder concluir
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut state = slot.state.lock().expect("slot mutex poisoned");
        loop {
            match &*state {
                SlotState::Ready(model) => return Ok(Arc::clone(model)),
                SlotState::Failed(e) => return Err(e.clone()),
                SlotState::Loading => match deadline {
                    None => {
                        state = slot.ready.wait(state).expect("slot mutex poisoned");
                    }
                    Some(deadline) => {
                        let now = Instant::now();
                        if now >= deadline {
                            return Err(ChunkerError::ModelLoadTimeout { key: key.to_string() });
                        }
                        let (guard, _timed_out) = slot
                            .ready
                            .wait_timeout(state, deadline - now)
                            .expect("slot mutex poisoned");
                        state = guard;
                    }
                },
            }
        }
    }

    /// Remove um modelo do cache. Retorna `true` se a chave existia.
    ///
    /// Handles já devolvidos permanecem válidos: o modelo é imutável e
    /// cada chamador segura seu próprio `Arc`.
    pub fn evict(&self, key: &str) -> bool {
        self.slots
            .lock()
            .expect("registry mutex poisoned")
            .remove(key)
            .is_some()
    }

    /// Verifica se a chave está presente (carregada ou em carregamento).
    pub fn contains(&self, key: &str) -> bool {
        self.slots
            .lock()
            .expect("registry mutex poisoned")
            .contains_key(key)
    }

    /// Número de chaves presentes no cache.
    pub fn len(&self) -> usize {
        self.slots.lock().expect("registry mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
