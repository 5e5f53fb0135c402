use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub phone: String,
    pub password: String,
    pub name: Option<String>,
    pub is_admin: bool,
    pub age: Option<i32>,
    /// single-character code: M / F / O
    pub gender: String,
    /// single-character code: N / M / S, or O when unspecified
    pub region: String,
    pub user_image_origin: Option<String>,
    pub user_image_record: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::audio_training_files::Entity")]
    AudioTrainingFiles,
}

impl Related<super::audio_training_files::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AudioTrainingFiles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
