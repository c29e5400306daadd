//! Fixed-content project files: the code-retention ruleset and the
//! build-performance properties.

use std::fs;
use std::path::Path;
use tracing::info;

use crate::errors::MigrateError;
use crate::migrate::fsio::io_error;

const RULES_TEMPLATE: &str = r#"
-dontobfuscate

# ===== Keep every application class (keeps JNI lookups working) =====
-keep class $NEW_PACKAGE.** { *; }

# ===== JNI =====
-keepclasseswithmembernames class * {
    native <methods>;
}

-keep class $NEW_PACKAGE.service.TProxyService {
    @kotlin.jvm.JvmStatic *;
}

# ===== Static members =====
-keepclassmembers class * {
    static <fields>;
    static <methods>;
}

# ===== Android components =====
-keep class * extends android.app.Service { *; }
-keep class * extends android.content.BroadcastReceiver { *; }

# ===== Attributes =====
-keepattributes Signature
-keepattributes InnerClasses
-keepattributes EnclosingMethod

# Missing classes reported by R8.
-dontwarn com.squareup.okhttp.CipherSuite
-dontwarn com.squareup.okhttp.ConnectionSpec
-dontwarn com.squareup.okhttp.TlsVersion
-dontwarn org.bouncycastle.jsse.BCSSLSocket
-dontwarn org.bouncycastle.jsse.provider.BouncyCastleJsseProvider
-dontwarn org.conscrypt.Conscrypt$Version
-dontwarn org.conscrypt.Conscrypt
-dontwarn org.conscrypt.ConscryptHostnameVerifier
-dontwarn org.joda.convert.FromString
-dontwarn org.joda.convert.ToString
-dontwarn org.openjsse.javax.net.ssl.SSLParameters
-dontwarn org.openjsse.javax.net.ssl.SSLSocket
-dontwarn org.openjsse.net.ssl.OpenJSSE

"#;

const PERFORMANCE_PROPERTIES: &str = r#"
# ===== JVM =====
# 4 GiB heap for large builds
org.gradle.jvmargs=-Xmx4g -XX:+UseParallelGC -Dfile.encoding=UTF-8

# ===== Gradle =====
org.gradle.parallel=true
org.gradle.caching=true
org.gradle.configureondemand=true

# ===== Android =====
android.enableR8.fullMode=true

# ===== Kotlin =====
kotlin.incremental=true
kotlin.incremental.useClasspathSnapshot=true

# ===== Project =====
android.enableJetifier=true
android.useAndroidX=true

# ===== Daemon / file watching =====
org.gradle.daemon.idletimeout=3600000
org.gradle.vfs.watch=true

"#;

/// Retention ruleset with the new package substituted in.
pub fn rules_content(new_package: &str) -> String {
    RULES_TEMPLATE.replace("$NEW_PACKAGE", new_package)
}

pub fn performance_content() -> &'static str {
    PERFORMANCE_PROPERTIES
}

fn write_file(path: &Path, contents: &str) -> Result<(), MigrateError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error("create directory", parent))?;
    }
    fs::write(path, contents).map_err(io_error("write", path))?;
    info!(path = %path.display(), bytes = contents.len(), "Wrote policy file");
    Ok(())
}

pub fn write_rules(path: &Path, new_package: &str) -> Result<(), MigrateError> {
    write_file(path, &rules_content(new_package))
}

pub fn write_performance(path: &Path) -> Result<(), MigrateError> {
    write_file(path, performance_content())
}
