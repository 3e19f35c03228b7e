// src/common/snapshots.rs
//
// Canais de snapshot por usuário. Cada coleção (leads, configurações, metas)
// tem um hub próprio; toda mutação bem-sucedida republica o snapshot completo
// e os assinantes sempre leem apenas o valor mais recente ("latest-wins",
// nunca deltas). Encerrar a sessão fecha os canais e termina os streams.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use axum::response::sse::Event;
use futures::stream::Stream;
use serde::Serialize;
use tokio::sync::watch;
use uuid::Uuid;

pub struct SnapshotHub<T> {
    canais: Mutex<HashMap<Uuid, watch::Sender<Arc<T>>>>,
}

impl<T> SnapshotHub<T> {
    pub fn new() -> Self {
        Self {
            canais: Mutex::new(HashMap::new()),
        }
    }

    /// Assina os snapshots do usuário. O canal é semeado com o estado atual,
    /// então o assinante recebe um snapshot imediatamente, antes de qualquer
    /// mutação.
    pub fn assinar(&self, user_id: Uuid, atual: T) -> watch::Receiver<Arc<T>> {
        let atual = Arc::new(atual);
        let mut canais = self.canais.lock().expect("lock dos canais de snapshot");
        match canais.get(&user_id) {
            Some(tx) => {
                tx.send_replace(atual);
                tx.subscribe()
            }
            None => {
                let (tx, rx) = watch::channel(atual);
                canais.insert(user_id, tx);
                rx
            }
        }
    }

    /// Publica um snapshot novo. Assinantes atrasados veem apenas o mais
    /// recente; sem assinantes, a publicação é descartada (a próxima
    /// assinatura recarrega o estado do banco).
    pub fn publicar(&self, user_id: Uuid, snapshot: T) {
        let canais = self.canais.lock().expect("lock dos canais de snapshot");
        if let Some(tx) = canais.get(&user_id) {
            tx.send_replace(Arc::new(snapshot));
        }
    }

    /// Fecha o canal do usuário. Todos os streams abertos terminam; um novo
    /// login cria assinaturas inteiramente novas.
    pub fn encerrar(&self, user_id: Uuid) {
        self.canais
            .lock()
            .expect("lock dos canais de snapshot")
            .remove(&user_id);
    }
}

impl<T> Default for SnapshotHub<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Converte um receiver de snapshots em um stream de eventos SSE. O primeiro
/// item sai sem esperar mudança; depois disso, um evento por snapshot novo.
/// O stream termina quando o canal é encerrado (sign-out).
pub fn stream_de_snapshots<T>(
    rx: watch::Receiver<Arc<T>>,
) -> impl Stream<Item = Result<Event, Infallible>>
where
    T: Serialize + Send + Sync + 'static,
{
    futures::stream::unfold((rx, true), |(mut rx, primeiro)| async move {
        if !primeiro && rx.changed().await.is_err() {
            return None;
        }
        let snapshot = rx.borrow_and_update().clone();
        match Event::default().json_data(&*snapshot) {
            Ok(evento) => Some((Ok::<_, Infallible>(evento), (rx, false))),
            Err(e) => {
                tracing::error!("Falha ao serializar snapshot para SSE: {}", e);
                None
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn assinante_recebe_o_estado_semeado() {
        let hub = SnapshotHub::new();
        let user = Uuid::new_v4();

        let rx = hub.assinar(user, vec![1, 2, 3]);
        assert_eq!(**rx.borrow(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn publicacoes_consecutivas_entregam_apenas_a_mais_recente() {
        let hub = SnapshotHub::new();
        let user = Uuid::new_v4();

        let mut rx = hub.assinar(user, vec![1]);
        rx.borrow_and_update();

        hub.publicar(user, vec![1, 2]);
        hub.publicar(user, vec![1, 2, 3]);

        rx.changed().await.unwrap();
        assert_eq!(**rx.borrow_and_update(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn publicar_sem_canal_nao_cria_canal() {
        let hub: SnapshotHub<Vec<i32>> = SnapshotHub::new();
        let user = Uuid::new_v4();

        hub.publicar(user, vec![1]);

        // A assinatura seguinte vê o estado semeado, não a publicação perdida.
        let rx = hub.assinar(user, vec![9]);
        assert_eq!(**rx.borrow(), vec![9]);
    }

    #[tokio::test]
    async fn encerrar_termina_os_streams_do_usuario() {
        let hub = SnapshotHub::new();
        let user = Uuid::new_v4();

        let mut rx = hub.assinar(user, vec![1]);
        rx.borrow_and_update();

        hub.encerrar(user);
        assert!(rx.changed().await.is_err());
    }

    #[tokio::test]
    async fn usuarios_diferentes_nao_compartilham_canal() {
        let hub = SnapshotHub::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let rx_alice = hub.assinar(alice, vec![1]);
        let rx_bob = hub.assinar(bob, vec![2]);

        hub.publicar(alice, vec![1, 1]);
        assert_eq!(**rx_alice.borrow(), vec![1, 1]);
        assert_eq!(**rx_bob.borrow(), vec![2]);
    }
}
