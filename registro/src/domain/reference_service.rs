//! Lookup tables for member form selects.

use std::sync::Arc;

use crate::domain::ports::ReferenceCatalogue;
use crate::domain::reference::normalize_name;
use crate::domain::{
    Autoidentificacion, AutoidentificacionUpdate, Error, NewAutoidentificacion, NewRegion,
    Provincia, Region, RegionUpdate, Session,
};

/// Read and maintain provinces, regions, and self-identification
/// categories.
#[derive(Clone)]
pub struct ReferenceService<C> {
    catalogue: Arc<C>,
    session: Arc<Session>,
}

impl<C> ReferenceService<C> {
    /// Create a new service with the given catalogue and session.
    pub fn new(catalogue: Arc<C>, session: Arc<Session>) -> Self {
        Self { catalogue, session }
    }
}

impl<C> ReferenceService<C>
where
    C: ReferenceCatalogue,
{
    /// Every province.
    pub async fn provincias(&self) -> Result<Vec<Provincia>, Error> {
        let token = self.session.bearer().await?;
        self.catalogue
            .provincias(&token)
            .await
            .map_err(|error| error.into_domain("Error cargando provincias"))
    }

    /// A single province.
    pub async fn provincia(&self, id: i64) -> Result<Provincia, Error> {
        let token = self.session.bearer().await?;
        self.catalogue
            .provincia(&token, id)
            .await
            .map_err(|error| error.into_domain("Error obteniendo la provincia"))
    }

    /// Every region.
    pub async fn regiones(&self) -> Result<Vec<Region>, Error> {
        let token = self.session.bearer().await?;
        self.catalogue
            .regiones(&token)
            .await
            .map_err(|error| error.into_domain("Error cargando regiones"))
    }

    /// A single region.
    pub async fn region(&self, id: i64) -> Result<Region, Error> {
        let token = self.session.bearer().await?;
        self.catalogue
            .region(&token, id)
            .await
            .map_err(|error| error.into_domain("Error obteniendo la región"))
    }

    /// Add a region.
    pub async fn create_region(&self, name: &str) -> Result<Region, Error> {
        let region = NewRegion {
            region: normalize_name(name, "la región")?,
        };
        let token = self.session.bearer().await?;
        self.catalogue
            .create_region(&token, &region)
            .await
            .map_err(|error| error.into_domain("Error creando la región"))
    }

    /// Rename a region.
    pub async fn update_region(&self, id: i64, name: &str) -> Result<Region, Error> {
        let region = RegionUpdate {
            id,
            region: Some(normalize_name(name, "la región")?),
        };
        let token = self.session.bearer().await?;
        self.catalogue
            .update_region(&token, &region)
            .await
            .map_err(|error| error.into_domain("Error actualizando la región"))
    }

    /// Every self-identification category.
    pub async fn autoidentificaciones(&self) -> Result<Vec<Autoidentificacion>, Error> {
        let token = self.session.bearer().await?;
        self.catalogue
            .autoidentificaciones(&token)
            .await
            .map_err(|error| error.into_domain("Error cargando autoidentificaciones"))
    }

    /// A single self-identification category.
    pub async fn autoidentificacion(&self, id: i64) -> Result<Autoidentificacion, Error> {
        let token = self.session.bearer().await?;
        self.catalogue
            .autoidentificacion(&token, id)
            .await
            .map_err(|error| error.into_domain("Error obteniendo la autoidentificación"))
    }

    /// Add a self-identification category.
    pub async fn create_autoidentificacion(
        &self,
        name: &str,
    ) -> Result<Autoidentificacion, Error> {
        let category = NewAutoidentificacion {
            nombre: normalize_name(name, "la autoidentificación")?,
        };
        let token = self.session.bearer().await?;
        self.catalogue
            .create_autoidentificacion(&token, &category)
            .await
            .map_err(|error| error.into_domain("Error creando la autoidentificación"))
    }

    /// Rename a self-identification category.
    pub async fn update_autoidentificacion(
        &self,
        id: i64,
        name: &str,
    ) -> Result<Autoidentificacion, Error> {
        let category = AutoidentificacionUpdate {
            id,
            nombre: normalize_name(name, "la autoidentificación")?,
        };
        let token = self.session.bearer().await?;
        self.catalogue
            .update_autoidentificacion(&token, &category)
            .await
            .map_err(|error| error.into_domain("Error actualizando la autoidentificación"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockReferenceCatalogue, MockTokenStore};
    use crate::test_support::logged_in_session;
    use mockable::DefaultClock;

    #[tokio::test]
    async fn region_names_are_normalised_before_sending() {
        let mut catalogue = MockReferenceCatalogue::new();
        catalogue
            .expect_update_region()
            .withf(|_, region| region.id == 3 && region.region.as_deref() == Some("AMAZONIA"))
            .times(1)
            .returning(|_, region| {
                Ok(Region {
                    id: region.id,
                    region: region.region.clone().unwrap_or_default(),
                })
            });
        let session = logged_in_session(Arc::new(DefaultClock), 1, "admin").await;

        let region = ReferenceService::new(Arc::new(catalogue), session)
            .update_region(3, " amazonia ")
            .await
            .expect("update succeeds");
        assert_eq!(region.region, "AMAZONIA");
    }

    #[tokio::test]
    async fn anonymous_callers_are_refused_locally() {
        let mut catalogue = MockReferenceCatalogue::new();
        catalogue.expect_provincias().never();
        let session = Arc::new(Session::new(
            Arc::new(MockTokenStore::new()),
            Arc::new(DefaultClock),
        ));

        let err = ReferenceService::new(Arc::new(catalogue), session)
            .provincias()
            .await
            .expect_err("no session");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
