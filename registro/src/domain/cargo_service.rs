//! Position management.

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::CargoRepository;
use crate::domain::{Cargo, CargoTipo, Error, NewCargo, Session};

/// Position workflows built on the position repository.
#[derive(Clone)]
pub struct CargoService<R> {
    repo: Arc<R>,
    session: Arc<Session>,
}

impl<R> CargoService<R> {
    /// Create a new service with the given repository and session.
    pub fn new(repo: Arc<R>, session: Arc<Session>) -> Self {
        Self { repo, session }
    }
}

impl<R> CargoService<R>
where
    R: CargoRepository,
{
    /// Every position.
    pub async fn list(&self) -> Result<Vec<Cargo>, Error> {
        let token = self.session.bearer().await?;
        self.repo
            .list(&token)
            .await
            .map_err(|error| error.into_domain("Error cargando cargos"))
    }

    /// A single position.
    pub async fn find(&self, id: i64) -> Result<Cargo, Error> {
        let token = self.session.bearer().await?;
        self.repo
            .find(&token, id)
            .await
            .map_err(|error| error.into_domain("Error obteniendo el cargo"))
    }

    /// Create a position after the required, forbidden-word, and duplicate
    /// checks against the current list.
    pub async fn create(&self, name: &str, tipo: CargoTipo) -> Result<Cargo, Error> {
        let cargo = NewCargo::new(name, tipo);
        cargo.validate(&[])?;
        let token = self.session.bearer().await?;
        let existing = self
            .repo
            .list(&token)
            .await
            .map_err(|error| error.into_domain("Error cargando cargos"))?;
        cargo.validate(&existing)?;

        let created = self
            .repo
            .create(&token, &cargo)
            .await
            .map_err(|error| error.into_domain("Error creando cargo"))?;
        info!(id = created.id, cargo = %created.cargo, tipo = %created.tipo, "cargo created");
        Ok(created)
    }

    /// Rename or recategorise a position.
    pub async fn update(&self, id: i64, name: &str, tipo: CargoTipo) -> Result<Cargo, Error> {
        let cargo = NewCargo::new(name, tipo);
        cargo.validate(&[])?;
        let token = self.session.bearer().await?;
        let existing: Vec<Cargo> = self
            .repo
            .list(&token)
            .await
            .map_err(|error| error.into_domain("Error cargando cargos"))?
            .into_iter()
            .filter(|other| other.id != id)
            .collect();
        cargo.validate(&existing)?;

        self.repo
            .update(&token, id, &cargo)
            .await
            .map_err(|error| error.into_domain("Error actualizando cargo"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockCargoRepository;
    use crate::test_support::logged_in_session;
    use mockable::DefaultClock;

    async fn service(repo: MockCargoRepository) -> CargoService<MockCargoRepository> {
        let session = logged_in_session(Arc::new(DefaultClock), 1, "admin").await;
        CargoService::new(Arc::new(repo), session)
    }

    fn presidente() -> Cargo {
        Cargo {
            id: 1,
            cargo: "PRESIDENTE".into(),
            tipo: CargoTipo::Dirigente,
        }
    }

    #[tokio::test]
    async fn duplicate_is_rejected_before_create() {
        let mut repo = MockCargoRepository::new();
        repo.expect_list().returning(|_| Ok(vec![presidente()]));
        repo.expect_create().never();

        let err = service(repo)
            .await
            .create(" presidente ", CargoTipo::Dirigente)
            .await
            .expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert!(err.message().contains("ya existe"));
    }

    #[tokio::test]
    async fn same_name_other_category_is_created() {
        let mut repo = MockCargoRepository::new();
        repo.expect_list().returning(|_| Ok(vec![presidente()]));
        repo.expect_create()
            .withf(|_, cargo| cargo.cargo == "PRESIDENTE" && cargo.tipo == CargoTipo::Miembro)
            .times(1)
            .returning(|_, cargo| {
                Ok(Cargo {
                    id: 2,
                    cargo: cargo.cargo.clone(),
                    tipo: cargo.tipo,
                })
            });

        let created = service(repo)
            .await
            .create("presidente", CargoTipo::Miembro)
            .await
            .expect("created");
        assert_eq!(created.id, 2);
    }

    #[tokio::test]
    async fn forbidden_word_skips_the_api() {
        let mut repo = MockCargoRepository::new();
        repo.expect_list().never();
        repo.expect_create().never();

        let err = service(repo)
            .await
            .create("Coordinador Provincial", CargoTipo::Dirigente)
            .await
            .expect_err("forbidden word");
        assert!(err.message().contains("PROVINCIA"));
    }

    #[tokio::test]
    async fn update_ignores_the_record_being_edited() {
        let mut repo = MockCargoRepository::new();
        repo.expect_list().returning(|_| Ok(vec![presidente()]));
        repo.expect_update()
            .times(1)
            .returning(|_, id, cargo| {
                Ok(Cargo {
                    id,
                    cargo: cargo.cargo.clone(),
                    tipo: cargo.tipo,
                })
            });

        service(repo)
            .await
            .update(1, "Presidente", CargoTipo::Dirigente)
            .await
            .expect("renaming to itself is allowed");
    }
}
