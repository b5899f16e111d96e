//! Catalog management service

use crate::{
    error::AppResult,
    models::resource::{CreateResource, Resource, ResourceKind, ResourceStatus},
    repository::Repository,
};

use crate::models::resource::ResourceKind::{Book, Game};
use crate::models::resource::ResourceStatus::{Available, Disabled};

/// Demo catalog used by the fill endpoint
const DEMO_RESOURCES: &[(&str, ResourceKind, ResourceStatus)] = &[
    // Books
    ("1984", Book, Available),
    ("Le Petit Prince", Book, Available),
    ("Harry Potter à l'école des sorciers", Book, Available),
    ("Les Misérables", Book, Available),
    ("L'Étranger", Book, Available),
    ("Don Quichotte", Book, Available),
    ("Moby Dick", Book, Available),
    ("Crime et Châtiment", Book, Available),
    ("Gatsby le Magnifique", Book, Available),
    ("Orgueil et Préjugés", Book, Available),
    ("Le Comte de Monte-Cristo", Book, Available),
    ("La Peste", Book, Available),
    ("Les Fleurs du mal", Book, Available),
    ("Le Rouge et le Noir", Book, Available),
    ("Voyage au centre de la Terre", Book, Available),
    ("Vingt mille lieues sous les mers", Book, Available),
    ("La Métamorphose", Book, Available),
    ("Les Trois Mousquetaires", Book, Available),
    ("Le Seigneur des Anneaux", Book, Available),
    ("Hunger Games", Book, Available),
    ("Dune", Book, Available),
    ("Sherlock Holmes : Une étude en rouge", Book, Available),
    ("L'Île mystérieuse", Book, Disabled),
    ("Frankenstein", Book, Available),
    ("Dracula", Book, Disabled),
    ("Le Parfum", Book, Available),
    ("Le Nom de la Rose", Book, Available),
    ("La Nuit des temps", Book, Available),
    ("L'Alchimiste", Book, Disabled),
    ("Les Hauts de Hurlevent", Book, Available),
    // Board games
    ("Catan", Game, Disabled),
    ("Risk", Game, Available),
    ("Carcassonne", Game, Available),
    ("Les Aventuriers du Rail", Game, Available),
    ("Splendor", Game, Available),
    ("Dixit", Game, Available),
    ("7 Wonders", Game, Available),
    ("Terraforming Mars", Game, Disabled),
    ("Azul", Game, Available),
    ("Pandemic", Game, Disabled),
    ("Kingdomino", Game, Available),
    ("Codenames", Game, Available),
    ("Small World", Game, Available),
    ("Scythe", Game, Available),
    ("Agricola", Game, Available),
    ("Everdell", Game, Disabled),
    ("Root", Game, Disabled),
    ("Wingspan", Game, Available),
    ("Architectes du Royaume de l'Ouest", Game, Disabled),
    ("Brass: Birmingham", Game, Available),
    ("Spirit Island", Game, Available),
    ("Gloomhaven", Game, Disabled),
    ("Clank!", Game, Disabled),
    ("Paladins du Royaume de l'Ouest", Game, Available),
    ("The Crew", Game, Available),
    ("The Mind", Game, Disabled),
    ("Tapestry", Game, Available),
    ("Anachrony", Game, Disabled),
    ("Project Gaia", Game, Disabled),
    ("Barrage", Game, Available),
];

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all resources
    pub async fn list_resources(&self) -> AppResult<Vec<Resource>> {
        self.repository.resources.list().await
    }

    /// Get resource by ID
    pub async fn get_resource(&self, id: i64) -> AppResult<Resource> {
        self.repository.resources.get_by_id(id).await
    }

    /// Create a new resource (no duplicate-title check)
    pub async fn create_resource(&self, resource: CreateResource) -> AppResult<Resource> {
        self.repository.resources.create(&resource).await
    }

    /// Set the status of a resource (admin enable/disable toggle).
    ///
    /// The write is unconditional and independent of any active loan.
    pub async fn set_resource_status(
        &self,
        id: i64,
        status: ResourceStatus,
    ) -> AppResult<Resource> {
        self.repository.resources.set_status(id, status).await
    }

    /// Seed the catalog with the demo dataset, skipping titles that already
    /// exist. Returns the number of resources added.
    pub async fn seed_demo_resources(&self) -> AppResult<usize> {
        let mut added = 0;

        for (title, kind, status) in DEMO_RESOURCES {
            if self.repository.resources.title_exists(title).await? {
                continue;
            }

            self.repository
                .resources
                .create(&CreateResource {
                    title: (*title).to_string(),
                    kind: *kind,
                    status: Some(*status),
                })
                .await?;

            added += 1;
        }

        tracing::info!("Seeded {} demo resources", added);

        Ok(added)
    }
}
