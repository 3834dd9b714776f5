use std::sync::LazyLock;

use labtransfer_types::DbId;

use crate::FieldTable;

/// A postal address of an organization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    pub id: Option<DbId>,
    pub name: Option<String>,
    pub complement: Option<String>,
    pub street: Option<String>,
    pub zip_code: Option<String>,
    pub city: Option<String>,
    pub map_coordinates: Option<String>,
    pub google_map_link: Option<String>,
    pub path_to_background_image: Option<String>,
    pub validated: bool,
}

static FIELDS: LazyLock<FieldTable<Address>> = LazyLock::new(|| {
    FieldTable::<Address>::builder()
        .text("name", |a| a.name.clone(), |a, v| a.name = v)
        .text("complement", |a| a.complement.clone(), |a, v| a.complement = v)
        .text("street", |a| a.street.clone(), |a, v| a.street = v)
        .text("zipCode", |a| a.zip_code.clone(), |a, v| a.zip_code = v)
        .text("city", |a| a.city.clone(), |a, v| a.city = v)
        .text("mapCoordinates", |a| a.map_coordinates.clone(), |a, v| a.map_coordinates = v)
        .text("googleMapLink", |a| a.google_map_link.clone(), |a, v| a.google_map_link = v)
        .text(
            "pathToBackgroundImage",
            |a| a.path_to_background_image.clone(),
            |a, v| a.path_to_background_image = v,
        )
        .flag("validated", |a| a.validated, |a, v| a.validated = v)
        .build()
});

impl_entity!(Address, Address, FIELDS);
