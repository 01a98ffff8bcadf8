//! # Service Registry - 싱글톤 의존성 주입 시스템
//!
//! `#[service]`, `#[repository]` 매크로가 생성하는 등록 정보를 모아
//! 타입별 싱글톤 인스턴스를 관리합니다.
//!
//! ## 동작 원리
//!
//! ```text
//! 1. 컴파일 타임
//!    ├─ 매크로가 ServiceRegistration / RepositoryRegistration 생성
//!    └─ inventory::submit! 으로 전역 목록에 수집
//!
//! 2. 애플리케이션 시작
//!    ├─ ServiceLocator::set() 으로 Database, RedisClient 등록
//!    └─ ServiceLocator::initialize_all() 로 리포지토리 → 서비스 순 생성
//!
//! 3. 런타임
//!    └─ XxxService::instance() → ServiceLocator::get::<XxxService>()
//! ```
//!
//! 타입 이름 매칭 규칙: `AttendanceRepository` → `"attendance"`,
//! `FeedbackService` → `"feedback"`.

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use async_trait::async_trait;
use log::{debug, error, info};
use once_cell::sync::Lazy;

/// 비즈니스 로직 서비스를 위한 공통 인터페이스
///
/// 모든 `#[service]` 매크로가 적용된 구조체가 이 trait을 자동 구현합니다.
#[async_trait]
pub trait Service: Send + Sync {
    /// 서비스의 고유 이름을 반환합니다.
    fn name(&self) -> &str;

    /// 서비스 초기화 로직을 수행합니다.
    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

/// 데이터 액세스 리포지토리를 위한 공통 인터페이스
///
/// 모든 `#[repository]` 매크로가 적용된 구조체가 이 trait을 자동 구현합니다.
#[async_trait]
pub trait Repository: Send + Sync {
    /// 리포지토리의 고유 이름을 반환합니다.
    fn name(&self) -> &str;

    /// 연결된 MongoDB 컬렉션의 이름을 반환합니다.
    fn collection_name(&self) -> &str;

    /// 리포지토리 초기화 로직을 수행합니다.
    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

/// 서비스 등록 정보 (`#[service]` 매크로가 생성)
pub struct ServiceRegistration {
    /// 서비스의 고유 이름 (검색 키로 사용)
    pub name: &'static str,
    /// 인스턴스 생성 함수
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

/// 리포지토리 등록 정보 (`#[repository]` 매크로가 생성)
pub struct RepositoryRegistration {
    /// 리포지토리의 고유 이름 (검색 키로 사용)
    pub name: &'static str,
    /// 인스턴스 생성 함수
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

inventory::collect!(ServiceRegistration);
inventory::collect!(RepositoryRegistration);

/// 서비스 이름 → 등록정보 매핑 캐시 (첫 접근 시 한 번만 구성)
static SERVICE_NAME_CACHE: Lazy<HashMap<String, &'static ServiceRegistration>> = Lazy::new(|| {
    let cache: HashMap<_, _> = inventory::iter::<ServiceRegistration>()
        .map(|registration| (normalize_registration_name(registration.name), registration))
        .collect();

    debug!("Service cache: {} entries loaded", cache.len());
    cache
});

/// 리포지토리 이름 → 등록정보 매핑 캐시 (첫 접근 시 한 번만 구성)
static REPOSITORY_NAME_CACHE: Lazy<HashMap<String, &'static RepositoryRegistration>> = Lazy::new(|| {
    let cache: HashMap<_, _> = inventory::iter::<RepositoryRegistration>()
        .map(|registration| (normalize_registration_name(registration.name), registration))
        .collect();

    debug!("Repository cache: {} entries loaded", cache.len());
    cache
});

/// 등록 이름의 `_service` / `_repository` 접미사를 제거합니다.
fn normalize_registration_name(name: &str) -> String {
    name.strip_suffix("_service")
        .or_else(|| name.strip_suffix("_repository"))
        .unwrap_or(name)
        .to_string()
}

/// 전체 모듈 경로가 포함된 타입 이름에서 마지막 세그먼트만 남깁니다.
///
/// `attendance_service_backend::services::feedback::FeedbackService` → `FeedbackService`
fn short_type_name(type_name: &str) -> &str {
    type_name.rsplit("::").next().unwrap_or(type_name)
}

/// 타입 이름에서 레지스트리 조회 키를 만듭니다.
///
/// `SessionRepository` → `("session", Kind::Repository)`
fn lookup_key(short_name: &str) -> Option<(String, ComponentKind)> {
    if let Some(entity) = short_name.strip_suffix("Repository") {
        return Some((entity.to_lowercase(), ComponentKind::Repository));
    }
    short_name
        .strip_suffix("Service")
        .map(|entity| (entity.to_lowercase(), ComponentKind::Service))
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ComponentKind {
    Repository,
    Service,
}

/// 싱글톤 의존성 주입 컨테이너
///
/// - 각 타입당 정확히 하나의 인스턴스만 생성
/// - 첫 요청 시점에 인스턴스 생성
/// - 초기화 중인 타입을 추적하여 순환 참조를 조기에 발견
pub struct ServiceLocator {
    /// 생성된 인스턴스 캐시 (`TypeId` 키)
    instances: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
    /// 현재 초기화 중인 타입들 (순환 참조 감지용)
    initializing: RwLock<HashSet<TypeId>>,
}

impl ServiceLocator {
    fn new() -> Self {
        Self {
            instances: RwLock::new(HashMap::new()),
            initializing: RwLock::new(HashSet::new()),
        }
    }

    fn cached<T: 'static + Send + Sync>() -> Option<Arc<T>> {
        let instances = LOCATOR.instances.read().unwrap_or_else(|e| e.into_inner());
        instances
            .get(&TypeId::of::<T>())
            .and_then(|instance| instance.clone().downcast::<T>().ok())
    }

    /// 지정된 타입의 싱글톤 인스턴스를 가져옵니다.
    ///
    /// # Panics
    ///
    /// - 순환 참조 (A → B → A)
    /// - 레지스트리에 등록되지 않은 타입
    /// - 등록된 생성자가 다른 타입을 반환한 경우
    ///
    /// 모두 배선(wiring) 오류이므로 시작 시점에 드러나도록 패닉합니다.
    pub fn get<T: 'static + Send + Sync>() -> Arc<T> {
        if let Some(instance) = Self::cached::<T>() {
            return instance;
        }

        let type_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();

        {
            let mut initializing = LOCATOR.initializing.write().unwrap_or_else(|e| e.into_inner());
            if !initializing.insert(type_id) {
                error!("Circular dependency detected for type: {}", type_name);
                panic!("Circular dependency detected: {} is already being initialized", type_name);
            }
        }

        // 생성자가 다른 의존성을 get() 하므로 instances 락을 잡지 않은 채로 생성합니다.
        let created = Self::construct::<T>(type_name);

        LOCATOR.initializing.write().unwrap_or_else(|e| e.into_inner()).remove(&type_id);

        match created {
            Ok(instance) => {
                let mut instances = LOCATOR.instances.write().unwrap_or_else(|e| e.into_inner());
                let stored = instances
                    .entry(type_id)
                    .or_insert_with(|| instance as Arc<dyn Any + Send + Sync>)
                    .clone();
                stored
                    .downcast::<T>()
                    .unwrap_or_else(|_| panic!("Type mismatch in ServiceLocator for {}", type_name))
            }
            Err(message) => {
                error!("Failed to create instance for {}: {}", type_name, message);
                panic!("{}", message);
            }
        }
    }

    fn construct<T: 'static + Send + Sync>(type_name: &str) -> Result<Arc<T>, String> {
        let short_name = short_type_name(type_name);

        let (entity_name, kind) = lookup_key(short_name).ok_or_else(|| format!(
            "Service not found: {}. Make sure it's registered with #[service] or #[repository] macro, or manually registered with ServiceLocator::set()",
            type_name
        ))?;

        let (registration_name, constructor) = match kind {
            ComponentKind::Repository => REPOSITORY_NAME_CACHE
                .get(&entity_name)
                .map(|r| (r.name, r.constructor))
                .ok_or_else(|| format!("No repository found for entity: {}", entity_name))?,
            ComponentKind::Service => SERVICE_NAME_CACHE
                .get(&entity_name)
                .map(|r| (r.name, r.constructor))
                .ok_or_else(|| format!("No service found for entity: {}", entity_name))?,
        };

        constructor()
            .downcast::<Arc<T>>()
            .map(|boxed| *boxed)
            .map_err(|_| format!("Type mismatch for component: {}", registration_name))
    }

    /// 외부에서 생성된 인스턴스(Database, RedisClient 등)를 직접 등록합니다.
    ///
    /// 매크로로 관리되지 않는 인프라 컴포넌트는 [`ServiceLocator::initialize_all`]
    /// 호출 전에 반드시 등록되어야 합니다.
    pub fn set<T: 'static + Send + Sync>(instance: Arc<T>) {
        info!("📦 Registering: {}", short_type_name(std::any::type_name::<T>()));

        let mut instances = LOCATOR.instances.write().unwrap_or_else(|e| e.into_inner());
        instances.insert(TypeId::of::<T>(), instance as Arc<dyn Any + Send + Sync>);
    }

    /// 모든 리포지토리와 서비스를 미리 생성합니다.
    ///
    /// 리포지토리를 먼저, 서비스를 나중에 생성하여 데이터 계층 의존성이
    /// 먼저 해결되도록 합니다.
    pub async fn initialize_all() -> Result<(), Box<dyn std::error::Error>> {
        info!("🔄 Initializing service registry");

        let mut repo_count = 0;
        for registration in inventory::iter::<RepositoryRegistration>() {
            let _instance = (registration.constructor)();
            debug!("   ├─ {}: ✓ Created", registration.name);
            repo_count += 1;
        }

        let mut service_count = 0;
        for registration in inventory::iter::<ServiceRegistration>() {
            let _instance = (registration.constructor)();
            debug!("   ├─ {}: ✓ Created", registration.name);
            service_count += 1;
        }

        info!(
            "🎉 Service registry initialized: {} repositories, {} services",
            repo_count, service_count
        );

        Ok(())
    }
}

/// 전역 서비스 로케이터 인스턴스
static LOCATOR: Lazy<ServiceLocator> = Lazy::new(ServiceLocator::new);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_registration_name() {
        assert_eq!(normalize_registration_name("feedback_service"), "feedback");
        assert_eq!(normalize_registration_name("attendance_repository"), "attendance");
        assert_eq!(normalize_registration_name("session"), "session");
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(
            short_type_name("attendance_service_backend::services::feedback::FeedbackService"),
            "FeedbackService"
        );
        assert_eq!(short_type_name("Database"), "Database");
    }

    #[test]
    fn test_lookup_key() {
        assert_eq!(
            lookup_key("SessionRepository"),
            Some(("session".to_string(), ComponentKind::Repository))
        );
        assert_eq!(
            lookup_key("ExportService"),
            Some(("export".to_string(), ComponentKind::Service))
        );
        assert_eq!(lookup_key("RedisClient"), None);
    }

    #[test]
    fn test_set_then_get_returns_same_instance() {
        struct ManualComponent {
            value: u32,
        }

        let component = Arc::new(ManualComponent { value: 42 });
        ServiceLocator::set(component.clone());

        let resolved = ServiceLocator::get::<ManualComponent>();
        assert_eq!(resolved.value, 42);
        assert!(Arc::ptr_eq(&component, &resolved));
    }
}
