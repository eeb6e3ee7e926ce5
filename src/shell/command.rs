//! Command-line builders for the external tools the pipeline drives.
//!
//! These produce the exact strings handed to `sh -c`. No quoting or
//! escaping is applied; callers are trusted, and several commands rely
//! on shell substitution (`$(docker ps -q)`) on purpose.

/// `docker ARGS`
pub fn docker(args: &str) -> String {
    format!("docker {args}")
}

/// `docker-compose ARGS`
pub fn compose(args: &str) -> String {
    format!("docker-compose {args}")
}

/// `make ARGS`
pub fn make(args: &str) -> String {
    format!("make {args}")
}

/// `docker-compose run --rm SERVICE ARGS`
pub fn backend_run(service: &str, args: &str) -> String {
    compose(&format!("run --rm {service} {args}"))
}

/// `docker-compose run --rm SERVICE python manage.py ARGS`
pub fn manage_py(service: &str, args: &str) -> String {
    backend_run(service, &format!("python manage.py {args}"))
}

/// Kill every running container.
pub fn kill_all_containers() -> String {
    docker("kill $(docker ps -q)")
}

/// Start a compose service.
pub fn start_service(service: &str) -> String {
    compose(&format!("start {service}"))
}

/// Drop and recreate the development database inside the db container.
pub fn reset_database(db_service: &str, database: &str) -> String {
    compose(&format!(
        "exec {db_service} psql --user postgres \
         -c \"drop database {database};\" -c \"create database {database};\""
    ))
}

/// List running containers; used as the engine readiness probe.
pub fn list_containers() -> String {
    docker("ps")
}

/// Forcibly restart the container engine application.
pub fn restart_container_engine() -> String {
    "killall Docker && open /Applications/Docker.app".to_string()
}

/// Restore a SQL dump through the backend container.
pub fn load_dump(backend_service: &str, database: &str, dump: &str) -> String {
    backend_run(
        backend_service,
        &format!("psql -U postgres -d {database} < {dump}"),
    )
}

/// Rebuild the given compose services.
pub fn build_services(services: &[String]) -> String {
    compose(&format!("build {}", services.join(" ")))
}

/// Install backend requirements into the local virtualenv.
pub fn install_requirements_local() -> String {
    "cd packages/django/server \
     && source .venv/bin/activate \
     && pip install -r requirements.base.txt"
        .to_string()
}

/// Prune containers, images, volumes, builders and networks.
pub fn clean_space() -> String {
    "docker container rm $(docker container ls -aq) \
     docker rmi -f $(docker images -q) \
     docker volume prune -f \
     && docker builder prune -f \
     && docker network prune -f"
        .to_string()
}
