//! School records repository: academic years, students and classes.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tadika_shared::types::PageRequest;
use tracing::info;
use uuid::Uuid;

use crate::entities::{academic_years, school_classes, students};

/// Error types for school record operations.
#[derive(Debug, thiserror::Error)]
pub enum SchoolError {
    /// Academic year not found.
    #[error("Academic year not found: {0}")]
    AcademicYearNotFound(Uuid),

    /// Student not found.
    #[error("Student not found: {0}")]
    StudentNotFound(Uuid),

    /// Class not found.
    #[error("Class not found: {0}")]
    ClassNotFound(Uuid),

    /// Academic year name already used.
    #[error("Academic year '{0}' already exists")]
    DuplicateAcademicYear(String),

    /// Class name already used within the year.
    #[error("Class '{0}' already exists in this academic year")]
    DuplicateClass(String),

    /// End date is not after the start date.
    #[error("Academic year must end after it starts")]
    InvalidDateRange,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an academic year.
#[derive(Debug, Clone)]
pub struct CreateAcademicYearInput {
    /// Display name (e.g., "2026/2027").
    pub name: String,
    /// First day of the year.
    pub starts_on: NaiveDate,
    /// Last day of the year.
    pub ends_on: NaiveDate,
    /// Marks the year as current, clearing the flag elsewhere.
    pub is_current: bool,
}

/// Input for registering a student.
#[derive(Debug, Clone)]
pub struct CreateStudentInput {
    /// Full name.
    pub full_name: String,
    /// Date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// Parent or guardian name.
    pub guardian_name: String,
    /// Parent or guardian phone.
    pub guardian_phone: Option<String>,
}

/// Input for creating a class.
#[derive(Debug, Clone)]
pub struct CreateClassInput {
    /// Academic year the class runs in.
    pub academic_year_id: Uuid,
    /// Class name.
    pub name: String,
    /// Level taught.
    pub level: String,
    /// Building or room, free text.
    pub building: Option<String>,
    /// Maximum number of enrollments.
    pub capacity: u32,
}

/// Repository for academic years, students and classes.
#[derive(Debug, Clone)]
pub struct SchoolRepository {
    db: DatabaseConnection,
}

impl SchoolRepository {
    /// Creates a new school repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an academic year.
    ///
    /// # Errors
    ///
    /// Returns `SchoolError::InvalidDateRange` if `ends_on <= starts_on` and
    /// `SchoolError::DuplicateAcademicYear` if the name is taken.
    pub async fn create_academic_year(
        &self,
        input: CreateAcademicYearInput,
    ) -> Result<academic_years::Model, SchoolError> {
        if input.ends_on <= input.starts_on {
            return Err(SchoolError::InvalidDateRange);
        }

        let txn = self.db.begin().await?;

        let taken = academic_years::Entity::find()
            .filter(academic_years::Column::Name.eq(&input.name))
            .count(&txn)
            .await?;
        if taken > 0 {
            return Err(SchoolError::DuplicateAcademicYear(input.name));
        }

        if input.is_current {
            academic_years::Entity::update_many()
                .col_expr(academic_years::Column::IsCurrent, false.into())
                .filter(academic_years::Column::IsCurrent.eq(true))
                .exec(&txn)
                .await?;
        }

        let year = academic_years::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name),
            starts_on: Set(input.starts_on),
            ends_on: Set(input.ends_on),
            is_current: Set(input.is_current),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(academic_year_id = %year.id, name = %year.name, "Academic year created");
        Ok(year)
    }

    /// Lists academic years, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_academic_years(&self) -> Result<Vec<academic_years::Model>, DbErr> {
        academic_years::Entity::find()
            .order_by_desc(academic_years::Column::StartsOn)
            .all(&self.db)
            .await
    }

    /// Finds an academic year by ID.
    ///
    /// # Errors
    ///
    /// Returns `SchoolError::AcademicYearNotFound` if it does not exist.
    pub async fn get_academic_year(&self, id: Uuid) -> Result<academic_years::Model, SchoolError> {
        academic_years::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(SchoolError::AcademicYearNotFound(id))
    }

    /// Registers a student.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create_student(&self, input: CreateStudentInput) -> Result<students::Model, DbErr> {
        let student = students::ActiveModel {
            id: Set(Uuid::now_v7()),
            full_name: Set(input.full_name),
            date_of_birth: Set(input.date_of_birth),
            guardian_name: Set(input.guardian_name),
            guardian_phone: Set(input.guardian_phone),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await?;

        info!(student_id = %student.id, "Student registered");
        Ok(student)
    }

    /// Finds a student by ID.
    ///
    /// # Errors
    ///
    /// Returns `SchoolError::StudentNotFound` if it does not exist.
    pub async fn get_student(&self, id: Uuid) -> Result<students::Model, SchoolError> {
        students::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(SchoolError::StudentNotFound(id))
    }

    /// Lists students by name, one page at a time.
    ///
    /// Returns the page and the total number of students.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_students(
        &self,
        page: &PageRequest,
    ) -> Result<(Vec<students::Model>, u64), DbErr> {
        let paginator = students::Entity::find()
            .order_by_asc(students::Column::FullName)
            .order_by_asc(students::Column::Id)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let items = paginator
            .fetch_page(u64::from(page.page.saturating_sub(1)))
            .await?;

        Ok((items, total))
    }

    /// Creates a class in an academic year.
    ///
    /// # Errors
    ///
    /// Returns `SchoolError::AcademicYearNotFound` for an unknown year and
    /// `SchoolError::DuplicateClass` if the name is taken in that year.
    pub async fn create_class(
        &self,
        input: CreateClassInput,
    ) -> Result<school_classes::Model, SchoolError> {
        let txn = self.db.begin().await?;

        academic_years::Entity::find_by_id(input.academic_year_id)
            .one(&txn)
            .await?
            .ok_or(SchoolError::AcademicYearNotFound(input.academic_year_id))?;

        let taken = school_classes::Entity::find()
            .filter(school_classes::Column::AcademicYearId.eq(input.academic_year_id))
            .filter(school_classes::Column::Name.eq(&input.name))
            .count(&txn)
            .await?;
        if taken > 0 {
            return Err(SchoolError::DuplicateClass(input.name));
        }

        let class = school_classes::ActiveModel {
            id: Set(Uuid::now_v7()),
            academic_year_id: Set(input.academic_year_id),
            name: Set(input.name),
            level: Set(input.level),
            building: Set(input.building),
            capacity: Set(i32::try_from(input.capacity).unwrap_or(i32::MAX)),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(class_id = %class.id, name = %class.name, "Class created");
        Ok(class)
    }

    /// Lists the classes of an academic year by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_classes(
        &self,
        academic_year_id: Uuid,
    ) -> Result<Vec<school_classes::Model>, DbErr> {
        school_classes::Entity::find()
            .filter(school_classes::Column::AcademicYearId.eq(academic_year_id))
            .order_by_asc(school_classes::Column::Name)
            .all(&self.db)
            .await
    }
}
